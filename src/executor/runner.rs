//! Text test runner
//!
//! Executes a suite once, streaming per-case progress at the requested
//! verbosity, then prints failure details and a summary:
//!
//! - `0`: summary only
//! - `1`: one character per case (`.`, `F`, `E`, `s`)
//! - `2` and above: one line per case with its name and outcome

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

use chrono::Utc;
use tracing::{debug, info};

use crate::models::{CaseError, RunResult, TestCase, TestResult, TestStatus};
use crate::utils::panic::panic_message;
use crate::utils::timer::Timer;

use super::loader::Suite;

const SEPARATOR_HEAVY: &str =
    "======================================================================";
const SEPARATOR_LIGHT: &str =
    "----------------------------------------------------------------------";

/// Runs a suite and reports to a text stream
pub struct TextTestRunner<W: Write> {
    verbosity: u32,
    stream: W,
}

impl TextTestRunner<io::Stderr> {
    /// Runner reporting to standard error
    pub fn stderr(verbosity: u32) -> Self {
        Self::new(verbosity, io::stderr())
    }
}

impl<W: Write> TextTestRunner<W> {
    pub fn new(verbosity: u32, stream: W) -> Self {
        Self { verbosity, stream }
    }

    pub fn into_inner(self) -> W {
        self.stream
    }

    fn dots(&self) -> bool {
        self.verbosity == 1
    }

    fn show_all(&self) -> bool {
        self.verbosity >= 2
    }

    /// Execute every case of the suite in order. Case failures, errors and
    /// panics are recorded and never stop the remaining cases.
    pub fn run(&mut self, suite: &Suite) -> io::Result<RunResult> {
        let started_at = Utc::now();
        let timer = Timer::start("suite");
        let mut results = Vec::with_capacity(suite.len());

        for case in suite.cases() {
            results.push(self.run_case(case)?);
        }

        let elapsed = timer.stop();
        let run = RunResult::new(started_at, elapsed.as_millis() as u64, results);

        if self.dots() || self.show_all() {
            writeln!(self.stream)?;
        }
        self.print_problems(&run, TestStatus::Error)?;
        self.print_problems(&run, TestStatus::Fail)?;

        writeln!(self.stream, "{SEPARATOR_LIGHT}")?;
        let noun = if run.total == 1 { "test" } else { "tests" };
        writeln!(
            self.stream,
            "Ran {} {} in {:.3}s",
            run.total,
            noun,
            elapsed.as_secs_f64()
        )?;
        writeln!(self.stream)?;
        writeln!(self.stream, "{}", summary_line(&run))?;
        self.stream.flush()?;

        info!("{}", run);
        Ok(run)
    }

    fn run_case(&mut self, case: &TestCase) -> io::Result<TestResult> {
        if self.show_all() {
            match case.description() {
                Some(description) => write!(self.stream, "{case}\n{description} ... ")?,
                None => write!(self.stream, "{case} ... ")?,
            }
            self.stream.flush()?;
        }

        let timer = Timer::start(case.name());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| case.run()));
        let duration_ms = timer.elapsed_ms();

        let result = TestResult::new(case.name(), case.unit(), TestStatus::Pass)
            .with_duration(duration_ms);
        let result = match outcome {
            Ok(Ok(())) => result,
            Ok(Err(CaseError::Failed(message))) => TestResult {
                status: TestStatus::Fail,
                ..result
            }
            .with_message(message),
            Ok(Err(CaseError::Skipped(reason))) => TestResult {
                status: TestStatus::Skip,
                ..result
            }
            .with_message(reason),
            Ok(Err(CaseError::Errored(error))) => TestResult {
                status: TestStatus::Error,
                ..result
            }
            .with_message(format!("{error:#}")),
            Err(payload) => TestResult {
                status: TestStatus::Fail,
                ..result
            }
            .with_message(format!("panicked: {}", panic_message(payload.as_ref()))),
        };

        debug!("{}", result);

        if self.show_all() {
            match (result.status, &result.message) {
                (TestStatus::Skip, Some(reason)) => writeln!(self.stream, "skipped '{reason}'")?,
                (status, _) => writeln!(self.stream, "{status}")?,
            }
        } else if self.dots() {
            write!(self.stream, "{}", result.status.symbol())?;
            self.stream.flush()?;
        }

        Ok(result)
    }

    fn print_problems(&mut self, run: &RunResult, status: TestStatus) -> io::Result<()> {
        for result in run.results.iter().filter(|r| r.status == status) {
            writeln!(self.stream, "{SEPARATOR_HEAVY}")?;
            writeln!(self.stream, "{}: {} ({})", status, result.name, result.unit)?;
            writeln!(self.stream, "{SEPARATOR_LIGHT}")?;
            writeln!(self.stream, "{}", result.message.as_deref().unwrap_or(""))?;
            writeln!(self.stream)?;
        }
        Ok(())
    }
}

/// Final `OK` / `FAILED (...)` line
fn summary_line(run: &RunResult) -> String {
    let mut infos = Vec::new();
    if run.failed > 0 {
        infos.push(format!("failures={}", run.failed));
    }
    if run.errors > 0 {
        infos.push(format!("errors={}", run.errors));
    }
    if run.skipped > 0 {
        infos.push(format!("skipped={}", run.skipped));
    }

    let head = if run.was_successful() { "OK" } else { "FAILED" };
    if infos.is_empty() {
        head.to_string()
    } else {
        format!("{head} ({})", infos.join(", "))
    }
}

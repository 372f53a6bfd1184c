//! Driver orchestration
//!
//! One linear pass per process:
//!
//! ```text
//! Idle -> PathsResolved -> ModulesLoading -> SuiteBuilt -> SuiteExecuting
//!      -> Succeeded | Failed | FatalImportError
//! ```
//!
//! There are no transitions back to an earlier state.

use std::fmt;
use std::io::{self, Write};
use std::process::ExitCode;

use tracing::{debug, info, warn};

use crate::cli::Invocation;
use crate::config::{environment_snapshot, DriverConfig};
use crate::error::DriverError;
use crate::models::RunResult;
use crate::paths::{discover_test_files, SearchPath};
use crate::registry::Registry;

use super::loader::SuiteLoader;
use super::runner::TextTestRunner;

/// Highest conventional verbosity level
pub const MAX_VERBOSITY: u32 = 2;

/// Exit code reported when any test case failed or errored
pub const FAILURE_EXIT_CODE: u8 = 2;

/// Exit code reported for argument, configuration and load errors
pub const FATAL_EXIT_CODE: u8 = 1;

/// Driver lifecycle state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    PathsResolved,
    ModulesLoading,
    SuiteBuilt,
    SuiteExecuting,
    Succeeded,
    Failed,
    FatalImportError,
}

impl DriverState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DriverState::Succeeded | DriverState::Failed | DriverState::FatalImportError
        )
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::Idle => "idle",
            DriverState::PathsResolved => "paths resolved",
            DriverState::ModulesLoading => "modules loading",
            DriverState::SuiteBuilt => "suite built",
            DriverState::SuiteExecuting => "suite executing",
            DriverState::Succeeded => "succeeded",
            DriverState::Failed => "failed",
            DriverState::FatalImportError => "fatal import error",
        };
        write!(f, "{name}")
    }
}

/// How the process should terminate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    Fatal,
}

impl Outcome {
    pub fn from_run(run: &RunResult) -> Self {
        if run.was_successful() {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Failure => FAILURE_EXIT_CODE,
            Outcome::Fatal => FATAL_EXIT_CODE,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.exit_code())
    }
}

/// Resolves lookup roots, loads the suite and runs it
pub struct Driver<'a> {
    registry: &'a Registry,
    config: &'a DriverConfig,
    state: DriverState,
}

impl<'a> Driver<'a> {
    pub fn new(registry: &'a Registry, config: &'a DriverConfig) -> Self {
        Self {
            registry,
            config,
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    fn transition(&mut self, next: DriverState) {
        debug!("Driver state: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Run the invocation, reporting to stderr with debug lines on stdout
    pub fn run(&mut self, invocation: &Invocation) -> Result<RunResult, DriverError> {
        let mut runner = TextTestRunner::stderr(invocation.verbosity);
        self.run_with(invocation, &mut runner, &mut io::stdout())
    }

    /// Run the invocation, reporting through the given runner. Debug lines
    /// go to `diagnostics` when the configuration enables them.
    pub fn run_with<W: Write, D: Write>(
        &mut self,
        invocation: &Invocation,
        runner: &mut TextTestRunner<W>,
        diagnostics: &mut D,
    ) -> Result<RunResult, DriverError> {
        if invocation.verbosity > MAX_VERBOSITY {
            warn!(
                "Verbosity {} is above {}; reporting as {}",
                invocation.verbosity, MAX_VERBOSITY, MAX_VERBOSITY
            );
        }

        let test_files = self.test_files(invocation)?;
        let search_path = SearchPath::compute(
            &invocation.main_execute_dir,
            &invocation.test_execute_dir,
            &test_files,
        );
        for root in search_path.iter() {
            debug!("Lookup root: {}", root);
            if self.config.debug {
                writeln!(diagnostics, "Appending {root} to search path")?;
            }
        }
        self.transition(DriverState::PathsResolved);

        self.transition(DriverState::ModulesLoading);
        let suite = SuiteLoader::new(self.registry, &search_path)
            .with_debug(self.config.debug)
            .load_to(&test_files, diagnostics)
            .map_err(|e| {
                self.transition(DriverState::FatalImportError);
                e
            })?;
        self.transition(DriverState::SuiteBuilt);

        self.transition(DriverState::SuiteExecuting);
        let run = runner.run(&suite)?;

        if run.was_successful() {
            self.transition(DriverState::Succeeded);
        } else {
            self.transition(DriverState::Failed);
        }

        Ok(run)
    }

    fn test_files(&self, invocation: &Invocation) -> Result<Vec<String>, DriverError> {
        if !invocation.test_files.is_empty() || !self.config.discover {
            return Ok(invocation.test_files.clone());
        }

        let discovered = discover_test_files(&invocation.test_execute_dir)?;
        if discovered.is_empty() {
            info!("No tests to run in {}", invocation.test_execute_dir);
        } else {
            info!(
                "Discovered {} test file(s) in {}",
                discovered.len(),
                invocation.test_execute_dir
            );
        }
        Ok(discovered)
    }
}

/// Write the raw arguments and the full environment, sorted by name
pub fn write_debug_banner<W: Write>(out: &mut W, argv: &[String]) -> io::Result<()> {
    writeln!(out, "WLST Test Driver arguments:")?;
    for (index, arg) in argv.iter().enumerate() {
        writeln!(out, "    argv[{index}] = {arg}")?;
    }

    writeln!(out)?;
    writeln!(out, "WLST Test Driver environment:")?;
    for (name, value) in environment_snapshot() {
        writeln!(out, "    {name} = {value}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fail, TestCase};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register("test_pass", || vec![TestCase::new("test_ok", || Ok(()))])
            .register("test_fail", || vec![TestCase::new("test_bad", || fail("nope"))]);
        registry
    }

    fn invocation(files: &[&str]) -> Invocation {
        Invocation::new(
            "/src/main",
            "/src/test",
            0,
            files.iter().map(|f| f.to_string()).collect(),
        )
    }

    fn run(
        registry: &Registry,
        config: &DriverConfig,
        invocation: &Invocation,
    ) -> (Result<RunResult, DriverError>, DriverState) {
        let (result, state, _) = run_capturing(registry, config, invocation);
        (result, state)
    }

    fn run_capturing(
        registry: &Registry,
        config: &DriverConfig,
        invocation: &Invocation,
    ) -> (Result<RunResult, DriverError>, DriverState, String) {
        let mut driver = Driver::new(registry, config);
        let mut runner = TextTestRunner::new(invocation.verbosity, Vec::new());
        let mut diagnostics = Vec::new();
        let result = driver.run_with(invocation, &mut runner, &mut diagnostics);
        let diagnostics = String::from_utf8(diagnostics).unwrap();
        (result, driver.state(), diagnostics)
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(Outcome::Success.exit_code(), 0);
        assert_eq!(Outcome::Failure.exit_code(), 2);
        assert_eq!(Outcome::Fatal.exit_code(), 1);
    }

    #[test]
    fn test_passing_run_succeeds() {
        let registry = registry();
        let config = DriverConfig::default();
        let (result, state) = run(&registry, &config, &invocation(&["/src/test/test_pass.py"]));

        let run = result.unwrap();
        assert_eq!(Outcome::from_run(&run), Outcome::Success);
        assert_eq!(state, DriverState::Succeeded);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_failing_case_fails_run() {
        let registry = registry();
        let config = DriverConfig::default();
        let (result, state) = run(
            &registry,
            &config,
            &invocation(&["/src/test/test_pass.py", "/src/test/test_fail.py"]),
        );

        let run = result.unwrap();
        assert_eq!(run.total, 2);
        assert_eq!(Outcome::from_run(&run), Outcome::Failure);
        assert_eq!(state, DriverState::Failed);
    }

    #[test]
    fn test_missing_unit_is_fatal() {
        let registry = registry();
        let config = DriverConfig::default();
        let (result, state) = run(
            &registry,
            &config,
            &invocation(&["/src/test/test_pass.py", "/src/test/test_absent.py"]),
        );

        assert!(matches!(result, Err(DriverError::Load(_))));
        assert_eq!(state, DriverState::FatalImportError);
    }

    #[test]
    fn test_empty_run_succeeds() {
        let registry = registry();
        let config = DriverConfig::default();
        let (result, state) = run(&registry, &config, &invocation(&[]));

        let run = result.unwrap();
        assert_eq!(run.total, 0);
        assert_eq!(Outcome::from_run(&run), Outcome::Success);
        assert_eq!(state, DriverState::Succeeded);
    }

    #[test]
    fn test_debug_reports_roots_and_units() {
        let registry = registry();
        let config = DriverConfig {
            debug: true,
            ..Default::default()
        };
        let (result, _, diagnostics) = run_capturing(
            &registry,
            &config,
            &invocation(&["/src/test/test_pass.py", "\\other\\test_fail.py"]),
        );

        assert!(result.is_ok());
        assert_eq!(
            diagnostics.lines().collect::<Vec<_>>(),
            [
                "Appending /src/main to search path",
                "Appending /src/test to search path",
                "Appending /other to search path",
                "Adding test unit test_pass defined by file /src/test/test_pass.py to the test suite",
                "Adding test unit test_fail defined by file \\other\\test_fail.py to the test suite",
            ]
        );
    }

    #[test]
    fn test_no_diagnostics_without_debug() {
        let registry = registry();
        let config = DriverConfig::default();
        let (result, _, diagnostics) = run_capturing(
            &registry,
            &config,
            &invocation(&["/src/test/test_pass.py", "/src/test/test_fail.py"]),
        );

        assert!(result.is_ok());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_debug_banner_lists_arguments_and_environment() {
        std::env::set_var("WLST_TEST_BANNER_MARKER", "shown");
        let mut out = Vec::new();
        let argv = ["wlst-test-driver".to_string(), "/src/main".to_string()];
        write_debug_banner(&mut out, &argv).unwrap();
        std::env::remove_var("WLST_TEST_BANNER_MARKER");

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(
            "WLST Test Driver arguments:\n    argv[0] = wlst-test-driver\n    argv[1] = /src/main\n\n"
        ));
        let environment = text
            .split_once("WLST Test Driver environment:\n")
            .map(|(_, rest)| rest)
            .unwrap();
        assert!(environment.contains("    WLST_TEST_BANNER_MARKER = shown\n"));
    }

    #[test]
    fn test_discovery_fills_empty_file_list() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("login_test.py"), "").unwrap();
        std::fs::write(dir.path().join("helper.py"), "").unwrap();

        let mut registry = registry();
        registry.register("login_test", || vec![TestCase::new("test_login", || Ok(()))]);
        let config = DriverConfig {
            discover: true,
            ..Default::default()
        };
        let invocation = Invocation::new(
            "/src/main",
            dir.path().to_string_lossy(),
            0,
            Vec::new(),
        );

        let (result, _) = run(&registry, &config, &invocation);
        assert_eq!(result.unwrap().passed, 1);
    }
}

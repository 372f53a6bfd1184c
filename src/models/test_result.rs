//! Test result models
//!
//! Per-case results and the aggregate result of one suite run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Test execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
    Error,
}

impl TestStatus {
    /// Progress character printed at verbosity 1
    pub fn symbol(&self) -> char {
        match self {
            TestStatus::Pass => '.',
            TestStatus::Fail => 'F',
            TestStatus::Skip => 's',
            TestStatus::Error => 'E',
        }
    }

    pub fn is_problem(&self) -> bool {
        matches!(self, TestStatus::Fail | TestStatus::Error)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "ok"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Skip => write!(f, "skipped"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single test case
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub unit: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub message: Option<String>,
}

impl TestResult {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, status: TestStatus) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            status,
            duration_ms: 0,
            message: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) ... {}", self.name, self.unit, self.status)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

/// Aggregate result of a suite run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl RunResult {
    pub fn new(started_at: DateTime<Utc>, duration_ms: u64, results: Vec<TestResult>) -> Self {
        let count = |status: TestStatus| results.iter().filter(|r| r.status == status).count();

        Self {
            started_at,
            total: results.len(),
            passed: count(TestStatus::Pass),
            failed: count(TestStatus::Fail),
            errors: count(TestStatus::Error),
            skipped: count(TestStatus::Skip),
            duration_ms,
            results,
        }
    }

    /// True when no case failed or errored. Vacuously true for an empty run.
    pub fn was_successful(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    pub fn problems(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| r.status.is_problem())
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Error: {} | Skip: {} | Duration: {}ms",
            self.total, self.passed, self.failed, self.errors, self.skipped, self.duration_ms
        )
    }
}

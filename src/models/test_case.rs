//! Test case model
//!
//! A test case is a named closure producing a `CaseResult`. Cases are grouped
//! into units by the registry and concatenated into a suite by the loader.

use std::fmt;

use thiserror::Error;

/// Outcome of a test case body
pub type CaseResult = Result<(), CaseError>;

/// Why a test case did not pass
#[derive(Debug, Error)]
pub enum CaseError {
    /// An expectation did not hold
    #[error("{0}")]
    Failed(String),

    /// The case decided not to run
    #[error("{0}")]
    Skipped(String),

    /// The case raised an unexpected error
    #[error(transparent)]
    Errored(#[from] anyhow::Error),
}

/// Fail the current case with a message
pub fn fail<T>(message: impl Into<String>) -> Result<T, CaseError> {
    Err(CaseError::Failed(message.into()))
}

/// Skip the current case with a reason
pub fn skip<T>(reason: impl Into<String>) -> Result<T, CaseError> {
    Err(CaseError::Skipped(reason.into()))
}

/// Fail with `message` unless `condition` holds
pub fn check(condition: bool, message: impl Into<String>) -> CaseResult {
    if condition {
        Ok(())
    } else {
        fail(message)
    }
}

/// Fail unless `left == right`
pub fn check_eq<T: PartialEq + fmt::Debug>(left: T, right: T) -> CaseResult {
    if left == right {
        Ok(())
    } else {
        fail(format!("{left:?} != {right:?}"))
    }
}

type CaseBody = Box<dyn Fn() -> CaseResult>;

/// A single named unit of test logic
pub struct TestCase {
    name: String,
    unit: String,
    description: Option<String>,
    body: CaseBody,
}

impl TestCase {
    pub fn new(name: impl Into<String>, body: impl Fn() -> CaseResult + 'static) -> Self {
        Self {
            name: name.into(),
            unit: String::new(),
            description: None,
            body: Box::new(body),
        }
    }

    /// First line of this description is shown at the highest verbosity
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .and_then(|d| d.lines().map(str::trim).find(|l| !l.is_empty()))
    }

    pub fn run(&self) -> CaseResult {
        (self.body)()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("unit", &self.unit)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.unit)
    }
}

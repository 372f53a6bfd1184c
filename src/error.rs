//! Error types
//!
//! Typed errors for loading units and driving a run. Failures inside
//! individual test cases are not errors at this level; the runner records
//! them per case.

use thiserror::Error;

/// Errors raised while resolving a test file to a registered unit
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no test unit named '{name}' (searched: {})", searched.join(", "))]
    ModuleNotFound { name: String, searched: Vec<String> },

    #[error("test unit '{name}' failed to initialize")]
    InitFailed {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("cannot derive a unit name from test file '{0}'")]
    InvalidTestFile(String),
}

/// Errors that abort a driver run
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to scan test directory '{path}'")]
    Discovery {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write test output")]
    Output(#[from] std::io::Error),
}

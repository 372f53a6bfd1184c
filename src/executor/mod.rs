//! Test execution engine
//!
//! Loads test units into a suite and runs it sequentially.

mod driver;
mod loader;
mod runner;

pub use driver::{
    write_debug_banner, Driver, DriverState, Outcome, FAILURE_EXIT_CODE, FATAL_EXIT_CODE,
    MAX_VERBOSITY,
};
pub use loader::{Suite, SuiteLoader};
pub use runner::TextTestRunner;

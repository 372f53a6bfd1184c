//! WLST Test Driver binary
//!
//! Runs the built-in test units. Projects with their own units build a
//! binary of their own around [`wlst_test_driver::run_main`].
//!
//! ## Usage
//!
//! ```bash
//! # Run one unit, one line per test
//! wlst-test-driver target/main target/test 2 target/test/driver_selftest.py
//!
//! # List registered units
//! wlst-test-driver --list
//!
//! # Print arguments, environment and resolution steps
//! WLST_TEST_PLUGIN_DEBUG=true wlst-test-driver target/main target/test 1 driver_selftest.py
//! ```

use std::process::ExitCode;

use wlst_test_driver::units;

fn main() -> ExitCode {
    wlst_test_driver::run_main(units::builtin())
}

//! WLST Test Driver
//!
//! Builds one test suite out of registered test units and runs it, for use
//! as the test goal of a build-tool plugin.
//!
//! ## Features
//!
//! - Test files are resolved to units through an explicit [`Registry`]
//! - Lookup roots are computed from the execute directories and test files
//! - unittest-style text report at verbosity 0, 1 or 2
//! - Exit code 2 when any test fails, 1 on argument or load errors
//! - Optional JSON report and test file discovery
//!
//! ## Usage
//!
//! A project registers its units and hands the registry to [`run_main`]:
//!
//! ```no_run
//! use wlst_test_driver::{check_eq, Registry, TestCase};
//!
//! fn main() -> std::process::ExitCode {
//!     let mut registry = Registry::new();
//!     registry.register("math_test", || {
//!         vec![TestCase::new("test_add", || check_eq(2 + 2, 4))]
//!     });
//!     wlst_test_driver::run_main(registry)
//! }
//! ```
//!
//! ```bash
//! my-driver target/main target/test 2 target/test/math_test.py
//! ```

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod executor;
pub mod models;
pub mod output;
pub mod paths;
pub mod registry;
pub mod units;
pub mod utils;

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

pub use cli::{Args, Invocation};
pub use config::DriverConfig;
pub use console::{Console, HostConsole};
pub use error::{DriverError, LoadError};
pub use executor::{Driver, Outcome, TextTestRunner};
pub use models::{check, check_eq, fail, skip, CaseError, CaseResult, RunResult, TestCase};
pub use paths::SearchPath;
pub use registry::Registry;

use crate::config::EnvConfig;
use crate::output::{save_report, ResultFormatter};
use crate::utils::logger::init_logger;

/// Run the driver on the process arguments and return the exit code
pub fn run_main(registry: Registry) -> ExitCode {
    let console = HostConsole::new();
    run_from(std::env::args_os(), &registry, &console).into()
}

/// Run the driver on the given arguments (the first is the program name)
pub fn run_from<I, T>(argv: I, registry: &Registry, console: &dyn Console) -> Outcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    console.silence();

    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
    let env = EnvConfig::load();

    // Arguments are dumped before they are validated
    let banner_shown = debug_requested(&argv, &env);
    if banner_shown {
        show_debug_banner(&argv);
    }

    let args = match Args::try_parse_from(&argv) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                Outcome::Fatal
            } else {
                Outcome::Success
            };
        }
    };

    let config = match resolve_config(&args, &env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return Outcome::Fatal;
        }
    };

    let level = if config.debug {
        config.log_level.unwrap_or_default()
    } else {
        console.log_level(config.log_level)
    };
    init_logger(level);

    if config.debug && !banner_shown {
        show_debug_banner(&argv);
    }

    match execute(&args, &config, registry) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{e:#}");
            Outcome::Fatal
        }
    }
}

/// Debug requested through the environment or a `--debug` flag, known
/// before the arguments are parsed
fn debug_requested(argv: &[OsString], env: &EnvConfig) -> bool {
    env.debug.unwrap_or(false)
        || argv
            .iter()
            .skip(1)
            .take_while(|arg| arg.as_os_str() != "--")
            .any(|arg| arg.as_os_str() == "--debug")
}

fn show_debug_banner(argv: &[OsString]) {
    let argv: Vec<String> = argv
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    if let Err(e) = executor::write_debug_banner(&mut io::stdout().lock(), &argv) {
        eprintln!("Failed to print debug banner: {e}");
    }
}

/// Defaults, then the config file, then the environment, then flags
fn resolve_config(args: &Args, env: &EnvConfig) -> Result<DriverConfig> {
    let config_file = args.config.as_ref().or(env.config_file.as_ref());
    let config = match config_file {
        Some(path) => DriverConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => DriverConfig::default(),
    };

    args.apply_to(config.merge_env(env))
}

fn execute(args: &Args, config: &DriverConfig, registry: &Registry) -> Result<Outcome> {
    if args.list {
        list_units(registry);
        return Ok(Outcome::Success);
    }

    if config.skip_tests {
        info!("Tests are skipped");
        return Ok(Outcome::Success);
    }

    let invocation = args
        .invocation()
        .context("Missing positional arguments")?;

    let run = Driver::new(registry, config)
        .run(&invocation)
        .context("Test run aborted")?;

    if let Some(rendered) = ResultFormatter::new(config.format).format_run(&run)? {
        println!("{rendered}");
    }

    if let Some(report) = &config.report {
        save_report(&run, report)?;
        info!("Run result written to {}", report);
    }

    Ok(Outcome::from_run(&run))
}

fn list_units(registry: &Registry) {
    println!("\nRegistered test units ({} total)\n", registry.len());
    for (name, location) in registry.units() {
        println!("  {name:30} [{location}]");
    }
    println!();
}

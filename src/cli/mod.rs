//! CLI argument parsing
//!
//! The build tool passes three positional arguments followed by the test
//! files, in order:
//!
//! ```text
//! wlst-test-driver <main_execute_dir> <test_execute_dir> <verbosity> [test_files...]
//! ```

use anyhow::{anyhow, Result};
use clap::Parser;

use crate::config::DriverConfig;
use crate::output::OutputFormat;
use crate::utils::logger::LogLevel;

/// Builds and runs the registered unit-test suites named by test files
#[derive(Parser, Debug)]
#[command(name = "wlst-test-driver")]
#[command(version)]
#[command(about = "Build and run a unit-test suite from registered test units")]
#[command(long_about = None)]
pub struct Args {
    /// Directory containing the code under test
    #[arg(required_unless_present = "list")]
    pub main_execute_dir: Option<String>,

    /// Directory containing the test files
    #[arg(required_unless_present = "list")]
    pub test_execute_dir: Option<String>,

    /// Report detail: 0 summary only, 1 one character per test, 2 one line per test
    #[arg(required_unless_present = "list")]
    pub verbosity: Option<u32>,

    /// Test files to load and run, in order
    pub test_files: Vec<String>,

    /// Print arguments, environment, and per-step diagnostics
    #[arg(long)]
    pub debug: bool,

    /// Configuration file (YAML or JSON)
    #[arg(long)]
    pub config: Option<String>,

    /// Output format for the run result on stdout (text, json, json-pretty)
    #[arg(long)]
    pub format: Option<String>,

    /// Write the run result as JSON to this file
    #[arg(long)]
    pub report: Option<String>,

    /// Scan the test directory for *test.py files when none are given
    #[arg(long)]
    pub discover: bool,

    /// List registered test units and exit
    #[arg(long)]
    pub list: bool,

    /// Exit successfully without running any tests
    #[arg(long)]
    pub skip_tests: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Positional arguments of one driver invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub main_execute_dir: String,
    pub test_execute_dir: String,
    pub verbosity: u32,
    pub test_files: Vec<String>,
}

impl Invocation {
    pub fn new(
        main_execute_dir: impl Into<String>,
        test_execute_dir: impl Into<String>,
        verbosity: u32,
        test_files: Vec<String>,
    ) -> Self {
        Self {
            main_execute_dir: main_execute_dir.into(),
            test_execute_dir: test_execute_dir.into(),
            verbosity,
            test_files,
        }
    }
}

impl Args {
    /// Positional arguments, absent only when `--list` was given without them
    pub fn invocation(&self) -> Option<Invocation> {
        Some(Invocation {
            main_execute_dir: self.main_execute_dir.clone()?,
            test_execute_dir: self.test_execute_dir.clone()?,
            verbosity: self.verbosity?,
            test_files: self.test_files.clone(),
        })
    }

    /// Overlay command-line flags onto a configuration
    pub fn apply_to(&self, mut config: DriverConfig) -> Result<DriverConfig> {
        if self.debug {
            config.debug = true;
        }
        if self.skip_tests {
            config.skip_tests = true;
        }
        if self.discover {
            config.discover = true;
        }
        if let Some(format) = &self.format {
            config.format = OutputFormat::from_str(format)
                .ok_or_else(|| anyhow!("Unknown output format: {format}"))?;
        }
        if let Some(report) = &self.report {
            config.report = Some(report.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = Some(
                LogLevel::from_str(level).ok_or_else(|| anyhow!("Unknown log level: {level}"))?,
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments() {
        let args = Args::parse_from([
            "wlst-test-driver",
            "/src/main",
            "/src/test",
            "2",
            "/src/test/test_foo.py",
            "/src/test/test_bar.py",
        ]);
        let invocation = args.invocation().unwrap();
        assert_eq!(invocation.main_execute_dir, "/src/main");
        assert_eq!(invocation.test_execute_dir, "/src/test");
        assert_eq!(invocation.verbosity, 2);
        assert_eq!(
            invocation.test_files,
            ["/src/test/test_foo.py", "/src/test/test_bar.py"]
        );
    }

    #[test]
    fn test_test_files_may_be_empty() {
        let args = Args::parse_from(["wlst-test-driver", "/src/main", "/src/test", "0"]);
        assert!(args.invocation().unwrap().test_files.is_empty());
    }

    #[test]
    fn test_missing_positionals_rejected() {
        assert!(Args::try_parse_from(["wlst-test-driver", "/src/main", "/src/test"]).is_err());
        assert!(Args::try_parse_from(["wlst-test-driver"]).is_err());
    }

    #[test]
    fn test_non_integer_verbosity_rejected() {
        let result = Args::try_parse_from(["wlst-test-driver", "/src/main", "/src/test", "loud"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_needs_no_positionals() {
        let args = Args::parse_from(["wlst-test-driver", "--list"]);
        assert!(args.list);
        assert!(args.invocation().is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "wlst-test-driver",
            "--debug",
            "--format",
            "json",
            "--log-level",
            "warn",
            "m",
            "t",
            "1",
        ]);
        let config = args.apply_to(DriverConfig::default()).unwrap();
        assert!(config.debug);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.log_level, Some(LogLevel::Warn));
    }

    #[test]
    fn test_unknown_format_is_error() {
        let args = Args::parse_from(["wlst-test-driver", "--format", "xml", "m", "t", "1"]);
        assert!(args.apply_to(DriverConfig::default()).is_err());
    }
}

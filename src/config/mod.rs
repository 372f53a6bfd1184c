//! Configuration module
//!
//! `DriverConfig` is resolved once at startup from, in increasing priority,
//! built-in defaults, an optional YAML/JSON file, `WLST_TEST_*` environment
//! variables, and command-line flags. It is then passed explicitly to the
//! driver.

mod env;

pub use env::{environment_snapshot, EnvConfig};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::output::OutputFormat;
use crate::utils::logger::LogLevel;

/// Driver configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Print arguments, environment, and per-step diagnostics
    pub debug: bool,

    /// Exit successfully without loading or running anything
    pub skip_tests: bool,

    /// Scan the test directory when no test files are given
    pub discover: bool,

    /// Rendering of the final run result on stdout
    pub format: OutputFormat,

    /// Write the run result as JSON to this path
    pub report: Option<String>,

    /// Requested log level; unset leaves the choice to the console
    pub log_level: Option<LogLevel>,
}

impl DriverConfig {
    /// Load configuration from file; `.yaml`/`.yml` is YAML, anything else JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        let config: Self = if is_yaml(path.as_ref()) {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        Ok(config)
    }

    #[cfg(test)]
    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = if is_yaml(path.as_ref()) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Overlay values set in the environment
    pub fn merge_env(mut self, env: &EnvConfig) -> Self {
        if let Some(debug) = env.debug {
            self.debug = debug;
        }
        if let Some(skip_tests) = env.skip_tests {
            self.skip_tests = skip_tests;
        }
        if let Some(format) = env.format {
            self.format = format;
        }
        if let Some(report) = &env.report {
            self.report = Some(report.clone());
        }
        if let Some(log_level) = env.log_level {
            self.log_level = Some(log_level);
        }
        self
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DriverConfig::default();
        assert!(!config.debug);
        assert!(!config.skip_tests);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_load_partial_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("driver.yaml");
        std::fs::write(&path, "debug: true\nformat: json-pretty\n").unwrap();

        let config = DriverConfig::load(&path).unwrap();
        assert!(config.debug);
        assert_eq!(config.format, OutputFormat::JsonPretty);
        assert!(config.report.is_none());
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("driver.json");
        let config = DriverConfig {
            skip_tests: true,
            report: Some("target/report.json".to_string()),
            log_level: Some(LogLevel::Warn),
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert_eq!(DriverConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("driver.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(DriverConfig::load(&path).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let env = EnvConfig {
            debug: Some(true),
            log_level: Some(LogLevel::Debug),
            ..Default::default()
        };
        let config = DriverConfig::default().merge_env(&env);
        assert!(config.debug);
        assert_eq!(config.log_level, Some(LogLevel::Debug));
        assert!(!config.skip_tests);
    }
}

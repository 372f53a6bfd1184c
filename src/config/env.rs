//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::collections::BTreeMap;
use std::env;

use crate::output::OutputFormat;
use crate::utils::logger::LogLevel;

/// Environment variable prefix
const ENV_PREFIX: &str = "WLST_TEST";

/// Configuration read from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Debug flag from WLST_TEST_PLUGIN_DEBUG
    pub debug: Option<bool>,
    /// Skip flag from WLST_TEST_SKIP_TESTS
    pub skip_tests: Option<bool>,
    /// Output format from WLST_TEST_FORMAT
    pub format: Option<OutputFormat>,
    /// Report path from WLST_TEST_REPORT
    pub report: Option<String>,
    /// Log level from WLST_TEST_LOG_LEVEL
    pub log_level: Option<LogLevel>,
    /// Config file from WLST_TEST_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            debug: get_env_bool("PLUGIN_DEBUG"),
            skip_tests: get_env_bool("SKIP_TESTS"),
            format: get_env("FORMAT").and_then(|v| OutputFormat::from_str(&v)),
            report: get_env("REPORT"),
            log_level: get_env("LOG_LEVEL").and_then(|v| LogLevel::from_str(&v)),
            config_file: get_env("CONFIG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.debug.is_some()
            || self.skip_tests.is_some()
            || self.format.is_some()
            || self.report.is_some()
            || self.log_level.is_some()
            || self.config_file.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// The full process environment, sorted by name
pub fn environment_snapshot() -> BTreeMap<String, String> {
    env::vars_os()
        .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
        .collect()
}

/// Builder for setting environment variables in tests
#[cfg(test)]
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

#[cfg(test)]
impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_PLUGIN_DEBUG"), debug.to_string()));
        self
    }

    pub fn skip_tests(mut self, skip: bool) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_SKIP_TESTS"), skip.to_string()));
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_FORMAT"), format.into()));
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_LOG_LEVEL"), level.into()));
        self
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        for (key, value) in self.vars {
            env::set_var(key, value);
        }

        EnvGuard { previous }
    }
}

#[cfg(test)]
impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.debug.is_none());
        assert!(!config.has_any());
    }

    #[test]
    fn test_env_debug_flag() {
        let _guard = EnvBuilder::new().debug(true).apply_scoped();
        assert_eq!(EnvConfig::load().debug, Some(true));
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = EnvBuilder::new().skip_tests(false).apply_scoped();
        assert_eq!(EnvConfig::load().skip_tests, Some(false));
    }

    #[test]
    fn test_env_enums() {
        let _guard = EnvBuilder::new()
            .format("json")
            .log_level("WARN")
            .apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert_eq!(config.log_level, Some(LogLevel::Warn));
        assert!(config.has_any());
    }

    #[test]
    fn test_snapshot_contains_set_variable() {
        env::set_var("WLST_TEST_SNAPSHOT_PROBE", "present");
        let snapshot = environment_snapshot();
        env::remove_var("WLST_TEST_SNAPSHOT_PROBE");

        assert_eq!(
            snapshot.get("WLST_TEST_SNAPSHOT_PROBE").map(String::as_str),
            Some("present")
        );
    }
}

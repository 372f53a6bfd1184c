//! Run result formatters
//!
//! The text report is streamed by the runner itself; these formats render
//! the finished `RunResult` for machines.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::RunResult;

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a run for stdout; `None` for the text format, whose report has
    /// already been streamed
    pub fn format_run(&self, run: &RunResult) -> Result<Option<String>> {
        let rendered = match self.format {
            OutputFormat::Text => None,
            OutputFormat::Json => {
                Some(serde_json::to_string(run).context("Failed to serialize run result")?)
            }
            OutputFormat::JsonPretty => {
                Some(serde_json::to_string_pretty(run).context("Failed to serialize run result")?)
            }
        };
        Ok(rendered)
    }
}

/// Write a run result as pretty JSON, creating parent directories as needed
pub fn save_report(run: &RunResult, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(run).context("Failed to serialize run result")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    Ok(())
}

//! Output formatting module
//!
//! Machine-readable renderings and saved reports of a run.

mod formatter;

pub use formatter::{save_report, OutputFormat, ResultFormatter};

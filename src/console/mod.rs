//! Host console capability
//!
//! The driver silences its host console once at startup, before anything is
//! loaded. The operations are a trait so the orchestration does not depend on
//! how a particular host implements them.

use std::cell::Cell;
use std::panic;

use crate::utils::logger::LogLevel;

/// Console silencing operations, invoked once at startup
pub trait Console {
    /// Stop routine host chatter from reaching the console
    fn suppress_console_output(&self);

    /// Stop panic backtraces from being dumped while cases run; the runner
    /// still records each panic message in the case result
    fn suppress_stack_traces(&self);

    /// Apply both suppressions
    fn silence(&self) {
        self.suppress_console_output();
        self.suppress_stack_traces();
    }

    /// Log level to use. An explicitly requested level always wins;
    /// otherwise the console may pick a quieter default.
    fn log_level(&self, requested: Option<LogLevel>) -> LogLevel {
        requested.unwrap_or_default()
    }
}

/// Console of the process the driver runs in
#[derive(Debug)]
pub struct HostConsole {
    quiet: Cell<bool>,
}

impl HostConsole {
    pub fn new() -> Self {
        Self {
            quiet: Cell::new(false),
        }
    }
}

impl Default for HostConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for HostConsole {
    fn suppress_console_output(&self) {
        self.quiet.set(true);
    }

    fn suppress_stack_traces(&self) {
        panic::set_hook(Box::new(|_| {}));
    }

    fn log_level(&self, requested: Option<LogLevel>) -> LogLevel {
        match requested {
            Some(level) => level,
            None if self.quiet.get() => LogLevel::Warn,
            None => LogLevel::default(),
        }
    }
}

/// Console that only records which suppressions were requested
#[derive(Debug, Default)]
pub struct RecordingConsole {
    output_suppressed: Cell<bool>,
    traces_suppressed: Cell<bool>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_suppressed(&self) -> bool {
        self.output_suppressed.get()
    }

    pub fn traces_suppressed(&self) -> bool {
        self.traces_suppressed.get()
    }
}

impl Console for RecordingConsole {
    fn suppress_console_output(&self) {
        self.output_suppressed.set(true);
    }

    fn suppress_stack_traces(&self) {
        self.traces_suppressed.set(true);
    }
}

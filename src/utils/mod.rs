//! Shared helpers: logging setup, timing and panic payloads.

pub mod logger;
pub mod panic;
pub mod timer;

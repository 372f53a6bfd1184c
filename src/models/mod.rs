//! Data models for test execution
//!
//! Test cases, per-case results, and the aggregate run result.

mod test_case;
mod test_result;

pub use test_case::{check, check_eq, fail, skip, CaseError, CaseResult, TestCase};
pub use test_result::{RunResult, TestResult, TestStatus};

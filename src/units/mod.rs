//! Built-in test units
//!
//! Units shipped with the driver binary. `driver_selftest` checks the
//! driver's own path handling so an installation can be smoke-tested with:
//!
//! ```bash
//! wlst-test-driver target/main target/test 2 target/test/driver_selftest.py
//! ```

use crate::models::{check, check_eq, TestCase};
use crate::paths::{module_name, normalize_separators, SearchPath};
use crate::registry::Registry;

/// Registry holding every built-in unit
pub fn builtin() -> Registry {
    let mut registry = Registry::new();
    registry.register("driver_selftest", selftest_cases);
    registry
}

fn selftest_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("test_separators_normalized", || {
            check_eq(normalize_separators("a\\b\\c"), "a/b/c".to_string())?;
            check_eq(normalize_separators("a/b/c"), "a/b/c".to_string())
        })
        .with_description("Backslashes become forward slashes, idempotently."),
        TestCase::new("test_unit_name_from_file", || {
            check_eq(module_name("/src/test/test_foo.py"), Some("test_foo"))?;
            check_eq(module_name("C:\\src\\test\\test_bar.py"), Some("test_bar"))
        }),
        TestCase::new("test_lookup_roots_deduplicated", || {
            let files = vec![
                "/src/test/test_foo.py".to_string(),
                "/src/test/test_bar.py".to_string(),
            ];
            let search_path = SearchPath::compute("/src/main", "/src/test", &files);
            check(
                search_path.roots() == ["/src/main", "/src/test"],
                format!("unexpected lookup roots {search_path}"),
            )
        }),
    ]
}

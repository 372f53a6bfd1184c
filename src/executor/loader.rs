//! Suite loading
//!
//! Resolves each test file to a registered unit and concatenates the units'
//! cases into one suite, in the order the files were given.

use std::io::{self, Write};

use tracing::{debug, info};

use crate::error::{DriverError, LoadError};
use crate::models::TestCase;
use crate::paths::{module_name, SearchPath};
use crate::registry::Registry;

/// Ordered aggregation of test cases, one group per test file
#[derive(Debug, Default)]
pub struct Suite {
    cases: Vec<TestCase>,
    units: Vec<String>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one unit's cases as a group
    pub fn add_unit(&mut self, unit: impl Into<String>, cases: Vec<TestCase>) {
        self.units.push(unit.into());
        self.cases.extend(cases);
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Builds a suite from test files through a registry and lookup roots
pub struct SuiteLoader<'a> {
    registry: &'a Registry,
    search_path: &'a SearchPath,
    debug: bool,
}

impl<'a> SuiteLoader<'a> {
    pub fn new(registry: &'a Registry, search_path: &'a SearchPath) -> Self {
        Self {
            registry,
            search_path,
            debug: false,
        }
    }

    /// Print a line per loaded unit
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Load every test file in order. The first file that cannot be resolved
    /// aborts loading, so no later file is ever loaded.
    pub fn load(&self, test_files: &[String]) -> Result<Suite, DriverError> {
        self.load_to(test_files, &mut io::stdout())
    }

    /// Like [`SuiteLoader::load`], writing debug lines to `diagnostics`
    pub fn load_to<D: Write>(
        &self,
        test_files: &[String],
        diagnostics: &mut D,
    ) -> Result<Suite, DriverError> {
        let mut suite = Suite::new();

        for test_file in test_files {
            let name = module_name(test_file)
                .ok_or_else(|| LoadError::InvalidTestFile(test_file.clone()))?;

            let cases = self.registry.load(name, self.search_path)?;
            debug!("Unit {} contributed {} case(s)", name, cases.len());

            if self.debug {
                writeln!(
                    diagnostics,
                    "Adding test unit {name} defined by file {test_file} to the test suite"
                )?;
            }

            suite.add_unit(name, cases);
        }

        info!(
            "Loaded {} test case(s) from {} unit(s)",
            suite.len(),
            suite.units().len()
        );

        Ok(suite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register("test_foo", || {
                vec![
                    TestCase::new("test_one", || Ok(())),
                    TestCase::new("test_two", || Ok(())),
                ]
            })
            .register("test_bar", || vec![TestCase::new("test_three", || Ok(()))]);
        registry
    }

    fn files(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_suite_preserves_file_order() {
        let registry = registry();
        let search_path = SearchPath::compute("/src/main", "/src/test", &[]);
        let suite = SuiteLoader::new(&registry, &search_path)
            .load(&files(&["/src/test/test_bar.py", "/src/test/test_foo.py"]))
            .unwrap();

        let names: Vec<_> = suite.cases().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["test_three", "test_one", "test_two"]);
        assert_eq!(suite.units(), ["test_bar", "test_foo"]);
    }

    #[test]
    fn test_empty_file_list_gives_empty_suite() {
        let registry = registry();
        let search_path = SearchPath::compute("/src/main", "/src/test", &[]);
        let suite = SuiteLoader::new(&registry, &search_path).load(&[]).unwrap();
        assert!(suite.is_empty());
    }

    #[test]
    fn test_unknown_unit_aborts_loading() {
        let registry = registry();
        let search_path = SearchPath::compute("/src/main", "/src/test", &[]);
        let err = SuiteLoader::new(&registry, &search_path)
            .load(&files(&["/src/test/test_foo.py", "/src/test/test_missing.py"]))
            .unwrap_err();

        assert!(matches!(
            err,
            DriverError::Load(LoadError::ModuleNotFound { ref name, .. }) if name == "test_missing"
        ));
    }

    #[test]
    fn test_debug_lines_per_unit() {
        let registry = registry();
        let search_path = SearchPath::compute("/src/main", "/src/test", &[]);
        let mut out = Vec::new();
        SuiteLoader::new(&registry, &search_path)
            .with_debug(true)
            .load_to(&files(&["/src/test/test_foo.py", "C:\\t\\test_bar.py"]), &mut out)
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Adding test unit test_foo defined by file /src/test/test_foo.py to the test suite\n\
             Adding test unit test_bar defined by file C:\\t\\test_bar.py to the test suite\n"
        );
    }

    #[test]
    fn test_no_debug_lines_by_default() {
        let registry = registry();
        let search_path = SearchPath::compute("/src/main", "/src/test", &[]);
        let mut out = Vec::new();
        SuiteLoader::new(&registry, &search_path)
            .load_to(&files(&["/src/test/test_foo.py"]), &mut out)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_directory_path_is_invalid() {
        let registry = registry();
        let search_path = SearchPath::new();
        let err = SuiteLoader::new(&registry, &search_path)
            .load(&files(&["/src/test/"]))
            .unwrap_err();
        assert!(matches!(err, DriverError::Load(LoadError::InvalidTestFile(_))));
    }
}

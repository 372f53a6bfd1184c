//! Test file discovery
//!
//! Walks a test directory and collects the files that follow the test
//! naming convention.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::DriverError;
use crate::paths::normalize_separators;

/// File name suffix (compared case-insensitively) marking a test file
pub const TEST_FILE_SUFFIX: &str = "test.py";

/// Recursively collect test files under `dir`, sorted by path.
///
/// A missing directory yields an empty list.
pub fn discover_test_files(dir: impl AsRef<Path>) -> Result<Vec<String>, DriverError> {
    let dir = dir.as_ref();
    let mut found = Vec::new();

    if dir.is_dir() {
        collect(dir, &mut found)?;
    } else {
        debug!("Test directory {} does not exist", dir.display());
    }

    found.sort();
    Ok(found)
}

fn collect(dir: &Path, found: &mut Vec<String>) -> Result<(), DriverError> {
    let entries = fs::read_dir(dir).map_err(|source| DriverError::Discovery {
        path: dir.display().to_string(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| DriverError::Discovery {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect(&path, found)?;
        } else if is_test_file(&path) {
            found.push(normalize_separators(&path.to_string_lossy()));
        }
    }

    Ok(())
}

fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            name.to_string_lossy()
                .to_lowercase()
                .ends_with(TEST_FILE_SUFFIX)
        })
        .unwrap_or(false)
}

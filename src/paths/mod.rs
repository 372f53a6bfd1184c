//! Lookup root resolution
//!
//! Builds the set of directories consulted when a test file is resolved to a
//! registered unit, and derives unit names from test file paths.

mod discovery;

pub use discovery::{discover_test_files, TEST_FILE_SUFFIX};

use std::fmt;

/// Replace every backslash separator with a forward slash
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Derive a bare unit name from a test file path: the file name without its
/// directory and without its final extension.
///
/// Returns `None` when the path has no file name component.
pub fn module_name(test_file: &str) -> Option<&str> {
    let file_name = test_file
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(test_file);

    // Leading dots belong to the stem, as in ".hidden"
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    let name = match file_name[stem_start..].rfind('.') {
        Some(dot) => &file_name[..stem_start + dot],
        None => file_name,
    };

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Normalized parent directory of a test file, empty when it has none
pub fn parent_dir(test_file: &str) -> String {
    let normalized = normalize_separators(test_file);
    match normalized.rfind('/') {
        Some(idx) => {
            let head = &normalized[..=idx];
            if head.chars().all(|c| c == '/') {
                head.to_string()
            } else {
                head.trim_end_matches('/').to_string()
            }
        }
        None => String::new(),
    }
}

/// Deduplicated, ordered list of lookup roots
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchPath {
    roots: Vec<String>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the lookup roots for a run: both execute directories plus the
    /// parent directory of every test file. Paths are not checked for
    /// existence.
    pub fn compute(main_execute_dir: &str, test_execute_dir: &str, test_files: &[String]) -> Self {
        let mut search_path = Self::new();
        search_path.push(main_execute_dir);
        search_path.push(test_execute_dir);

        for test_file in test_files {
            let parent = parent_dir(test_file);
            if !parent.is_empty() {
                search_path.push(&parent);
            }
        }

        search_path
    }

    /// Append a root unless an equal normalized root is already present.
    /// Returns whether the root was added.
    pub fn push(&mut self, root: &str) -> bool {
        let root = normalize_separators(root);
        if self.roots.contains(&root) {
            return false;
        }
        self.roots.push(root);
        true
    }

    pub fn contains(&self, root: &str) -> bool {
        self.roots.contains(&normalize_separators(root))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().map(String::as_str)
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.roots.join(", "))
    }
}

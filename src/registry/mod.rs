//! Test unit registry
//!
//! Maps a unit name (the stem of a test file) to the provider that builds its
//! test cases. Units are registered explicitly, either globally or scoped to
//! one lookup root. Resolution walks the lookup roots in order, so a unit
//! scoped to an earlier root shadows later ones and any global unit.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::error::LoadError;
use crate::models::TestCase;
use crate::paths::{normalize_separators, SearchPath};
use crate::utils::panic::panic_message;

type Provider = Box<dyn Fn() -> Result<Vec<TestCase>>>;

/// Where a unit was found during resolution
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitLocation {
    Root(String),
    Global,
}

impl fmt::Display for UnitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitLocation::Root(root) => write!(f, "{root}"),
            UnitLocation::Global => write!(f, "<registry>"),
        }
    }
}

/// Registry of test unit providers
#[derive(Default)]
pub struct Registry {
    global: BTreeMap<String, Provider>,
    scoped: BTreeMap<(String, String), Provider>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit resolvable from any lookup root
    pub fn register<F>(&mut self, name: impl Into<String>, provider: F) -> &mut Self
    where
        F: Fn() -> Vec<TestCase> + 'static,
    {
        self.global
            .insert(name.into(), Box::new(move || Ok(provider())));
        self
    }

    /// Register a unit whose provider may fail while building its cases
    pub fn register_fallible<F>(&mut self, name: impl Into<String>, provider: F) -> &mut Self
    where
        F: Fn() -> Result<Vec<TestCase>> + 'static,
    {
        self.global.insert(name.into(), Box::new(provider));
        self
    }

    /// Register a unit visible only through the given lookup root
    pub fn register_in<F>(
        &mut self,
        root: &str,
        name: impl Into<String>,
        provider: F,
    ) -> &mut Self
    where
        F: Fn() -> Vec<TestCase> + 'static,
    {
        self.scoped.insert(
            (normalize_separators(root), name.into()),
            Box::new(move || Ok(provider())),
        );
        self
    }

    pub fn len(&self) -> usize {
        self.global.len() + self.scoped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.scoped.is_empty()
    }

    /// Registered units with their location, sorted by name
    pub fn units(&self) -> Vec<(String, UnitLocation)> {
        let mut units: Vec<_> = self
            .global
            .keys()
            .map(|name| (name.clone(), UnitLocation::Global))
            .chain(
                self.scoped
                    .keys()
                    .map(|(root, name)| (name.clone(), UnitLocation::Root(root.clone()))),
            )
            .collect();
        units.sort_by(|a, b| a.0.cmp(&b.0));
        units
    }

    /// Find the provider for `name`, consulting `search_path` roots in order
    fn resolve(&self, name: &str, search_path: &SearchPath) -> Option<(UnitLocation, &Provider)> {
        for root in search_path.iter() {
            if let Some(provider) = self.scoped.get(&(root.to_string(), name.to_string())) {
                return Some((UnitLocation::Root(root.to_string()), provider));
            }
        }

        self.global
            .get(name)
            .map(|provider| (UnitLocation::Global, provider))
    }

    /// Resolve `name` and build its test cases, tagged with the unit name.
    /// A provider that returns an error or panics fails the whole unit.
    pub fn load(&self, name: &str, search_path: &SearchPath) -> Result<Vec<TestCase>, LoadError> {
        let (location, provider) =
            self.resolve(name, search_path)
                .ok_or_else(|| LoadError::ModuleNotFound {
                    name: name.to_string(),
                    searched: search_path.roots().to_vec(),
                })?;

        debug!("Resolved unit {} from {}", name, location);

        let built = panic::catch_unwind(AssertUnwindSafe(|| provider()))
            .unwrap_or_else(|payload| {
                Err(anyhow!("panicked: {}", panic_message(payload.as_ref())))
            });
        let cases = built.map_err(|source| LoadError::InitFailed {
            name: name.to_string(),
            source,
        })?;

        Ok(cases.into_iter().map(|case| case.with_unit(name)).collect())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("units", &self.units())
            .finish()
    }
}

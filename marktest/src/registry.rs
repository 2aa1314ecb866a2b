//! Type resolution: fully-qualified names to fresh instances.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use thiserror::Error;
use tracing::debug;

use crate::suite::{Instantiate, Subject, Suite};

/// Resolution or instantiation of a type under test failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscoveryFailure {
    #[error("type `{type_name}` not found")]
    NotFound { type_name: String },

    #[error("cannot instantiate `{type_name}`: {reason}")]
    Instantiation { type_name: String, reason: String },
}

impl DiscoveryFailure {
    pub fn type_name(&self) -> &str {
        match self {
            DiscoveryFailure::NotFound { type_name }
            | DiscoveryFailure::Instantiation { type_name, .. } => type_name,
        }
    }
}

/// Resolves a fully-qualified type name to a fresh object under test.
pub trait TypeResolver {
    fn resolve(&self, type_name: &str) -> Result<Box<dyn Subject>, DiscoveryFailure>;
}

/// Name-keyed table of registered suites.
#[derive(Default)]
pub struct Registry {
    types: BTreeMap<String, Box<dyn Instantiate>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a suite under its own name. Names must be unique.
    pub fn register<T: 'static>(&mut self, suite: Suite<T>) -> Result<&mut Self> {
        let name = suite.name().to_string();
        if self.types.contains_key(&name) {
            bail!("type `{name}` is already registered");
        }
        debug!(type_name = %name, procedures = suite.len(), "registered suite");
        self.types.insert(name, Box::new(suite));
        Ok(self)
    }

    /// Registered names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for Registry {
    fn resolve(&self, type_name: &str) -> Result<Box<dyn Subject>, DiscoveryFailure> {
        let entry = self
            .types
            .get(type_name)
            .ok_or_else(|| DiscoveryFailure::NotFound {
                type_name: type_name.to_string(),
            })?;
        entry.instantiate()
    }
}

//! Registration tables for types under test.
//!
//! A [`Suite`] is built once, when the type is defined: a name, a
//! constructor, and an ordered list of procedures with their markers. Each
//! run instantiates a fresh object through the constructor and drives it via
//! the type-erased [`Subject`] trait.

use std::fmt;
use std::rc::Rc;

use anyhow::Result;

use crate::core::types::{MarkerSet, Outcome, Procedure, Raised};
use crate::registry::DiscoveryFailure;

type Body<T> = Rc<dyn Fn(&mut T) -> Outcome>;
type Constructor<T> = Box<dyn Fn() -> Result<T>>;

struct Entry<T> {
    name: String,
    markers: MarkerSet,
    body: Body<T>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            markers: self.markers,
            body: Rc::clone(&self.body),
        }
    }
}

/// Instantiated object under test, as seen by the orchestrator.
pub trait Subject {
    fn type_name(&self) -> &str;

    /// Registered procedures in registration order.
    fn procedures(&self) -> Vec<Procedure>;

    fn invoke(&mut self, procedure: &Procedure) -> Outcome;
}

/// Something that can produce fresh [`Subject`]s.
pub trait Instantiate {
    fn type_name(&self) -> &str;

    fn instantiate(&self) -> Result<Box<dyn Subject>, DiscoveryFailure>;
}

/// Registration table for one type.
pub struct Suite<T> {
    name: String,
    construct: Constructor<T>,
    entries: Rc<Vec<Entry<T>>>,
}

impl<T: 'static> Suite<T> {
    pub fn new<F>(name: impl Into<String>, construct: F) -> Self
    where
        F: Fn() -> Result<T> + 'static,
    {
        Self {
            name: name.into(),
            construct: Box::new(construct),
            entries: Rc::new(Vec::new()),
        }
    }

    /// Register a procedure. Registration order is discovery order.
    pub fn procedure<F>(
        mut self,
        name: impl Into<String>,
        markers: impl Into<MarkerSet>,
        body: F,
    ) -> Self
    where
        F: Fn(&mut T) -> Outcome + 'static,
    {
        let entry = Entry {
            name: name.into(),
            markers: markers.into(),
            body: Rc::new(body),
        };
        // Live instances keep the table they were created with.
        Rc::make_mut(&mut self.entries).push(entry);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Default + 'static> Suite<T> {
    /// Suite whose instances come from `T::default()`.
    pub fn default_constructed(name: impl Into<String>) -> Self {
        Self::new(name, || Ok(T::default()))
    }
}

impl<T> fmt::Debug for Suite<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("procedures", &self.entries.len())
            .finish()
    }
}

impl<T: 'static> Instantiate for Suite<T> {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn instantiate(&self) -> Result<Box<dyn Subject>, DiscoveryFailure> {
        let object = (self.construct)().map_err(|err| DiscoveryFailure::Instantiation {
            type_name: self.name.clone(),
            reason: format!("{err:#}"),
        })?;
        Ok(Box::new(Instance {
            type_name: self.name.clone(),
            object,
            entries: Rc::clone(&self.entries),
        }))
    }
}

/// One run's object under test together with its suite's procedures.
struct Instance<T> {
    type_name: String,
    object: T,
    entries: Rc<Vec<Entry<T>>>,
}

impl<T> Subject for Instance<T> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn procedures(&self) -> Vec<Procedure> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Procedure::new(index, entry.name.clone(), entry.markers))
            .collect()
    }

    fn invoke(&mut self, procedure: &Procedure) -> Outcome {
        let entry = self.entries.get(procedure.index()).ok_or_else(|| {
            Raised::error(anyhow::anyhow!(
                "{} has no procedure at index {}",
                self.type_name,
                procedure.index()
            ))
        })?;
        (entry.body)(&mut self.object)
    }
}

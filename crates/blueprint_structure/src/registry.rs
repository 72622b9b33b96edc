//! Named structure types.
//!
//! A [`Registry`] maps names to structure types defined through it. Types
//! defined in a registry can reference each other by name, including
//! forward and self references, through [`LazyStruct`] handles resolved on
//! first coercion.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use blueprint_foundation::{Error, ErrorKind, Result};

use crate::attribute::Nested;
use crate::context::AttributeScope;
use crate::structure::StructType;

/// Name-indexed collection of structure types.
#[derive(Debug, Default)]
pub struct Registry {
    types: RwLock<HashMap<Arc<str>, Arc<StructType>>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Defines and registers a root structure type.
    ///
    /// # Errors
    ///
    /// Returns an argument error if `name` is taken, or any definition error.
    pub fn define<F>(self: &Arc<Self>, name: &str, block: F) -> Result<Arc<StructType>>
    where
        F: FnOnce(&mut AttributeScope<'_>) -> Result<()>,
    {
        self.ensure_vacant(name)?;
        let structure = StructType::compile(Some(name), None, Some(Arc::downgrade(self)), block)?;
        self.insert(&structure)?;
        Ok(structure)
    }

    /// Defines and registers a structure type extending a registered one.
    ///
    /// # Errors
    ///
    /// Returns an unresolved-structure error if `parent` is not registered,
    /// an argument error if `name` is taken, or any definition error.
    pub fn extend<F>(self: &Arc<Self>, parent: &str, name: &str, block: F) -> Result<Arc<StructType>>
    where
        F: FnOnce(&mut AttributeScope<'_>) -> Result<()>,
    {
        let parent = self
            .get(parent)
            .ok_or_else(|| Error::new(ErrorKind::UnresolvedStructure(parent.to_string())))?;
        self.ensure_vacant(name)?;
        let structure =
            StructType::compile(Some(name), Some(&parent), Some(Arc::downgrade(self)), block)?;
        self.insert(&structure)?;
        Ok(structure)
    }

    /// Looks up a structure type by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<StructType>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<_> = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A lazy reference to `name` in `registry`.
    pub(crate) fn lazy(registry: Weak<Self>, name: &str) -> Nested {
        Nested::Lazy(Arc::new(LazyStruct {
            name: Arc::from(name),
            registry,
            resolved: OnceCell::new(),
        }))
    }

    fn ensure_vacant(&self, name: &str) -> Result<()> {
        if self.contains(name) {
            return Err(Error::argument(format!(
                "structure type '{name}' is already defined"
            )));
        }
        Ok(())
    }

    fn insert(&self, structure: &Arc<StructType>) -> Result<()> {
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        let name: Arc<str> = Arc::from(structure.name());
        if types.contains_key(&name) {
            return Err(Error::argument(format!(
                "structure type '{name}' is already defined"
            )));
        }
        types.insert(name, Arc::clone(structure));
        debug!(structure = structure.name(), total = types.len(), "registered structure type");
        Ok(())
    }
}

/// A structure type referenced by name, resolved once on first use.
///
/// The resolved type is cached as a [`Weak`] handle: a self-referencing
/// type owns its own `LazyStruct`, so a strong cache would keep it alive.
pub struct LazyStruct {
    name: Arc<str>,
    registry: Weak<Registry>,
    resolved: OnceCell<Weak<StructType>>,
}

impl LazyStruct {
    /// The referenced name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true once the reference has been resolved and the type is
    /// still alive.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some_and(|w| w.strong_count() > 0)
    }

    /// Resolves the reference, caching the result.
    ///
    /// # Errors
    ///
    /// Returns an unresolved-structure error if the registry is gone, the
    /// name is not registered, or the resolved type has been dropped.
    /// Failures are not cached.
    pub fn resolve(&self) -> Result<Arc<StructType>> {
        let unresolved = || Error::new(ErrorKind::UnresolvedStructure(self.name.to_string()));
        self.resolved
            .get_or_try_init(|| {
                let registry = self.registry.upgrade().ok_or_else(unresolved)?;
                let structure = registry.get(&self.name).ok_or_else(unresolved)?;
                trace!(structure = %self.name, "resolved lazy structure reference");
                Ok(Arc::downgrade(&structure))
            })?
            .upgrade()
            .ok_or_else(unresolved)
    }
}

impl fmt::Debug for LazyStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyStruct")
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

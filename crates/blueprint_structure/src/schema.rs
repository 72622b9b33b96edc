//! Per-type attribute schemas.
//!
//! A [`Schema`] maps attribute names to attributes for one structure type.
//! A derived schema starts from a copy of its parent's entries; a
//! redeclared name replaces the inherited attribute in place, so the
//! parent's field order is stable across the hierarchy.

use std::sync::Arc;

use indexmap::IndexMap;

use blueprint_foundation::{Error, ErrorKind, Result};

use crate::attribute::Attribute;

/// Name-indexed attributes of one structure type.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    entries: IndexMap<Arc<str>, Arc<Attribute>>,
    own: Vec<Arc<str>>,
}

impl Schema {
    /// Builds a schema from a parent's and this type's own attributes.
    ///
    /// Later declarations of the same name win.
    ///
    /// # Errors
    ///
    /// Returns an unnamed-attribute error if any attribute lacks a name.
    pub fn derive(parent: Option<&Self>, attributes: Vec<Attribute>) -> Result<Self> {
        let mut schema = Self {
            entries: parent.map(|p| p.entries.clone()).unwrap_or_default(),
            own: Vec::with_capacity(attributes.len()),
        };

        for attribute in attributes {
            let name: Arc<str> = attribute
                .name()
                .map(Arc::from)
                .ok_or_else(|| Error::new(ErrorKind::UnnamedAttribute))?;
            if !schema.own.contains(&name) {
                schema.own.push(Arc::clone(&name));
            }
            schema.entries.insert(name, Arc::new(attribute));
        }

        Ok(schema)
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Attribute>> {
        self.entries.get(name)
    }

    /// Position of an attribute in field order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    /// Returns true if the schema has an attribute with this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Attributes in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Arc<Attribute>)> {
        self.entries.iter()
    }

    /// Attribute names in field order.
    pub fn names(&self) -> impl Iterator<Item = &Arc<str>> {
        self.entries.keys()
    }

    /// Names declared by this type itself, in declaration order.
    #[must_use]
    pub fn own_names(&self) -> &[Arc<str>] {
        &self.own
    }

    /// Returns true if this type declared `name` itself.
    #[must_use]
    pub fn is_own(&self, name: &str) -> bool {
        self.own.iter().any(|own| own.as_ref() == name)
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Structure instances.
//!
//! An [`Instance`] holds one slot per schema attribute. Reads and writes go
//! through the compiled accessors, which run the getter transform or setter
//! pipeline. Private getters and setters are refused; only the constructor
//! and serializer bypass visibility.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use blueprint_foundation::{Error, ErrorKind, Record, RecordRef, Result, StructId, Value, ValueMap};

use crate::attribute::Side;
use crate::compiler::CompiledAccessor;
use crate::schema::Schema;
use crate::structure::StructType;

/// An instance of a [`StructType`].
#[derive(Clone)]
pub struct Instance {
    structure: Arc<StructType>,
    slots: Vec<Value>,
}

impl Instance {
    /// An instance with every slot `nil`.
    pub(crate) fn blank(structure: Arc<StructType>) -> Self {
        let slots = vec![Value::Nil; structure.schema().len()];
        Self { structure, slots }
    }

    /// The instance's structure type.
    #[must_use]
    pub const fn structure(&self) -> &Arc<StructType> {
        &self.structure
    }

    /// The structure type's schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        self.structure.schema()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Reads an attribute (or alias) through its getter.
    ///
    /// # Errors
    ///
    /// Returns an unknown-attribute or private-access error, or propagates a
    /// failing getter transform.
    pub fn get(&self, name: &str) -> Result<Value> {
        let accessor = self.accessor(name, Side::Get)?;
        accessor
            .read(&self.slots[accessor.slot()])
            .map_err(|e| e.in_structure(self.structure.name()))
    }

    /// Writes an attribute (or alias) through its setter.
    ///
    /// # Errors
    ///
    /// Returns an unknown-attribute or private-access error, or any setter
    /// pipeline error. The stored value is unchanged on error.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let accessor = self.accessor(name, Side::Set)?;
        let slot = accessor.slot();
        let prepared = accessor
            .prepare(value.into())
            .map_err(|e| e.in_structure(self.structure.name()))?;
        self.slots[slot] = prepared;
        Ok(())
    }

    /// Returns true if the stored value is present (not blank). The getter
    /// transform is not applied.
    ///
    /// # Errors
    ///
    /// Returns an unknown-attribute or private-access error.
    pub fn is_present(&self, name: &str) -> Result<bool> {
        self.stored(name).map(Value::is_present)
    }

    /// Raw stored value, bypassing the getter transform.
    ///
    /// # Errors
    ///
    /// Returns an unknown-attribute or private-access error, like
    /// [`Instance::get`].
    pub fn stored(&self, name: &str) -> Result<&Value> {
        let accessor = self.accessor(name, Side::Get)?;
        Ok(&self.slots[accessor.slot()])
    }

    /// Stores a prepared value during construction.
    pub(crate) fn assign(&mut self, slot: usize, value: Value) -> Result<()> {
        let prepared = self.structure.accessors()[slot].prepare(value)?;
        self.slots[slot] = prepared;
        Ok(())
    }

    fn accessor(&self, name: &str, side: Side) -> Result<&CompiledAccessor> {
        let accessor = self.structure.accessor(name).ok_or_else(|| {
            Error::new(ErrorKind::UnknownAttribute {
                name: name.to_string(),
                structure: self.structure.name().to_string(),
            })
        })?;
        if accessor.is_private(side) {
            return Err(Error::new(ErrorKind::PrivateAccess {
                name: name.to_string(),
                accessor: match side {
                    Side::Get => "getter",
                    Side::Set => "setter",
                },
                structure: self.structure.name().to_string(),
            }));
        }
        Ok(accessor)
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Projects the instance to a keyed mapping.
    ///
    /// # Errors
    ///
    /// Propagates getter, value method, or nested projection failures.
    pub fn as_json(&self) -> Result<ValueMap> {
        let accessors = self.structure.accessors();
        self.structure
            .serializer()
            .run(|slot| accessors[slot].read(&self.slots[slot]))
            .map_err(|e| e.in_structure(self.structure.name()))
    }
}

impl Record for Instance {
    fn struct_id(&self) -> StructId {
        self.structure.id()
    }

    fn type_name(&self) -> Arc<str> {
        Arc::from(self.structure.name())
    }

    fn is_a(&self, id: StructId) -> bool {
        self.structure.descends_from(id)
    }

    fn fields(&self) -> Vec<(Arc<str>, Value)> {
        self.schema()
            .names()
            .cloned()
            .zip(self.slots.iter().cloned())
            .collect()
    }

    fn to_json(&self) -> Result<ValueMap> {
        self.as_json()
    }

    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Self::Record(RecordRef::new(instance))
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.structure.id() == other.structure.id() && self.slots == other.slots
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{}", self.structure.name())?;
        for (name, value) in self.schema().names().zip(&self.slots) {
            write!(f, " {name}={value:?}")?;
        }
        write!(f, ">")
    }
}

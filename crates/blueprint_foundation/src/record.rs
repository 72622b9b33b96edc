//! Structure instances as values.
//!
//! Structure types live in a higher layer, but their instances must be
//! storable inside [`Value`] (nested structures, arrays of structures). The
//! [`Record`] trait is the seam: the structure layer implements it, and this
//! layer only relies on identity, ancestry, and projection.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::Result;
use crate::collections::ValueMap;
use crate::value::Value;

/// Unique identity of a structure type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructId(u64);

static NEXT_STRUCT_ID: AtomicU64 = AtomicU64::new(1);

impl StructId {
    /// Allocates a fresh identity.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_STRUCT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric identity.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StructId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A structure instance stored inside a [`Value`].
pub trait Record: fmt::Debug + Send + Sync + 'static {
    /// Identity of the instance's structure type.
    fn struct_id(&self) -> StructId;

    /// Display name of the instance's structure type.
    fn type_name(&self) -> Arc<str>;

    /// Returns true if the instance's type is `id` or descends from it.
    fn is_a(&self, id: StructId) -> bool;

    /// Stored field values in schema order, bypassing accessors.
    fn fields(&self) -> Vec<(Arc<str>, Value)>;

    /// Projects the instance to a plain keyed mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if a getter or serialization transform fails.
    fn to_json(&self) -> Result<ValueMap>;

    /// Clones the record behind a fresh box.
    fn clone_record(&self) -> Box<dyn Record>;

    /// Upcast for downcasting to the concrete instance type.
    fn as_any(&self) -> &dyn Any;
}

/// Owned handle to a [`Record`].
pub struct RecordRef(Box<dyn Record>);

impl RecordRef {
    /// Wraps a record.
    #[must_use]
    pub fn new(record: impl Record) -> Self {
        Self(Box::new(record))
    }

    /// Downcasts to a concrete record type.
    #[must_use]
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl std::ops::Deref for RecordRef {
    type Target = dyn Record;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Clone for RecordRef {
    fn clone(&self) -> Self {
        Self(self.0.clone_record())
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.struct_id() == other.struct_id() && self.fields() == other.fields()
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

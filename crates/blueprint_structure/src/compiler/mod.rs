//! Definition-time compilers.
//!
//! Attributes are turned into executable plans once, when a structure type
//! is defined:
//! - [`accessor`] - getter transforms and setter pipelines
//! - [`constructor`] - how construction fills each attribute
//! - [`serializer`] - how an instance projects to a keyed mapping

pub mod accessor;
pub mod constructor;
pub mod serializer;

pub use accessor::{CompiledAccessor, SetStep};
pub use constructor::{ConstructorPlan, InitStep};
pub use serializer::{JsonStep, SerializerPlan};

//! Declarative structure types for Blueprint.
//!
//! This crate provides:
//! - [`Attribute`] and [`AttributeBuilder`] - Field declarations
//! - [`AttributeContext`] and [`AttributeScope`] - Declaration blocks with shared defaults
//! - [`Schema`] - Per-type attribute maps with inheritance
//! - [`compiler`] - Accessor, constructor and serialization plans
//! - [`StructType`] and [`Instance`] - The structure runtime
//! - [`Registry`] - Named types with lazy cross references

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod attribute;
pub mod builder;
pub mod compiler;
pub mod context;
pub mod defaults;
pub mod instance;
pub mod registry;
pub mod schema;
pub mod structure;

pub use attribute::{AsJson, Attribute, DefaultValue, Nested, Side, Transform};
pub use builder::AttributeBuilder;
pub use context::{AttributeContext, AttributeScope, Declare};
pub use defaults::Defaults;
pub use instance::Instance;
pub use registry::{LazyStruct, Registry};
pub use schema::Schema;
pub use structure::StructType;

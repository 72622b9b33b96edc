//! Blueprint - Declarative structure definitions
//!
//! This crate re-exports all layers of the Blueprint system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: blueprint_structure  - Attributes, schemas, compilers, structure runtime
//! Layer 0: blueprint_foundation - Core types (Value, Type, Record, Error)
//! ```
//!
//! # Example
//!
//! ```
//! use blueprint::{Declare, DefaultValue, StructType, Type, Value, value_map};
//!
//! let user = StructType::define("User", |s| {
//!     s.attr_with("name", Some(Type::string()), DefaultValue::Absent, |_| Ok(()))?;
//!     s.attr("email?")?.set("downcase")?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let ann = user
//!     .construct(&value_map! { "name" => "Ann", "email" => "ANN@EXAMPLE.COM" })
//!     .unwrap();
//! assert_eq!(ann.get("email").unwrap(), Value::from("ann@example.com"));
//! ```

pub use blueprint_foundation as foundation;
pub use blueprint_structure as structure;

pub use blueprint_foundation::{Error, ErrorKind, Result, Type, TypeError, Value, ValueMap, value_map};
pub use blueprint_structure::{
    AsJson, Attribute, AttributeBuilder, AttributeContext, AttributeScope, Declare,
    DefaultValue, Defaults, Instance, Nested, Registry, Schema, Side, StructType, Transform,
};

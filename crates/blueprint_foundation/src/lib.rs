//! Core values, type predicates, and errors for Blueprint.
//!
//! This crate provides:
//! - [`Value`] - The dynamic value type held by structure fields
//! - [`Type`] - Composable type predicates with composed failure reports
//! - [`Record`] - The seam through which structure instances become values
//! - [`ValueMethod`] - Named conversions used by accessor transforms
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod ident;
pub mod methods;
pub mod record;
#[cfg(feature = "serde")]
mod serialize;
pub mod types;
pub mod value;

pub use collections::{LtVec, ValueMap};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use methods::ValueMethod;
pub use record::{Record, RecordRef, StructId};
pub use types::{Class, Literal, Pattern, StructClass, Type, TypeError, TypeErrorReason};
pub use value::Value;

//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Type predicates, value methods, Error, and
//! persistent collections.

mod methods;
mod values;

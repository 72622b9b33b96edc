//! Identifier validation for attribute names and aliases.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[A-Za-z][A-Za-z0-9_]*\z").expect("identifier pattern compiles"));

/// Returns true if `name` is a valid attribute identifier.
///
/// Identifiers start with an ASCII letter followed by ASCII letters,
/// digits, or underscores.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Validates an attribute name.
///
/// # Errors
///
/// Returns a naming error if `name` is not an identifier.
pub fn attribute_name(name: &str) -> Result<Arc<str>> {
    if is_identifier(name) {
        Ok(Arc::from(name))
    } else {
        Err(Error::invalid_name(name))
    }
}

/// Validates an alias.
///
/// # Errors
///
/// Returns a naming error if `name` is not an identifier.
pub fn alias_name(name: &str) -> Result<Arc<str>> {
    if is_identifier(name) {
        Ok(Arc::from(name))
    } else {
        Err(Error::invalid_alias(name))
    }
}

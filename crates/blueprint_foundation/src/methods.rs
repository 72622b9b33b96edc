//! Named value methods.
//!
//! Accessor transforms and serialization can refer to a conversion by name
//! (`"to_i"`, `"upcase"`, ...). Names are resolved once, when the attribute
//! is declared, into a [`ValueMethod`].

use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::collections::ValueMap;
use crate::error::{Error, ErrorKind, Result};
use crate::value::Value;

static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A\s*[+-]?\d+").expect("integer prefix pattern compiles"));

static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A\s*[+-]?\d+(\.\d+)?([eE][+-]?\d+)?").expect("float prefix pattern compiles")
});

/// A conversion applied to a value by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ValueMethod {
    /// Integer conversion; strings parse their leading digits, else 0.
    ToI,
    /// Float conversion; strings parse their leading number, else 0.0.
    ToF,
    /// String conversion.
    ToS,
    /// Array conversion; nil becomes empty, maps become key/value pairs.
    ToA,
    /// Uppercase a string.
    Upcase,
    /// Lowercase a string.
    Downcase,
    /// Trim surrounding whitespace from a string.
    Strip,
    /// Length of a string, array, or map.
    #[strum(to_string = "length", serialize = "size")]
    Length,
    /// Deep projection to plain data (records become maps).
    AsJson,
}

impl ValueMethod {
    /// Resolves a method by name.
    ///
    /// # Errors
    ///
    /// Returns an argument error naming the unknown method.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| Error::argument(format!("unknown value method '{name}'")))
    }

    /// Applies the method to `value`.
    ///
    /// # Errors
    ///
    /// Returns an unsupported-method error when the receiver's class does not
    /// respond to this method, or propagates a record projection failure.
    pub fn apply(self, value: &Value) -> Result<Value> {
        match self {
            Self::ToI => to_i(value).map(Value::Int).ok_or_else(|| self.unsupported(value)),
            Self::ToF => to_f(value)
                .map(Value::Float)
                .ok_or_else(|| self.unsupported(value)),
            Self::ToS => Ok(Value::from(value.to_string())),
            Self::ToA => self.to_a(value),
            Self::Upcase => self.map_str(value, str::to_uppercase),
            Self::Downcase => self.map_str(value, str::to_lowercase),
            Self::Strip => self.map_str(value, |s| s.trim().to_string()),
            Self::Length => self.length(value),
            Self::AsJson => as_json(value),
        }
    }

    fn unsupported(self, value: &Value) -> Error {
        Error::new(ErrorKind::UnsupportedMethod {
            method: self.to_string(),
            class: value.class_name(),
        })
    }

    fn map_str(self, value: &Value, f: impl Fn(&str) -> String) -> Result<Value> {
        value
            .as_str()
            .map(|s| Value::from(f(s)))
            .ok_or_else(|| self.unsupported(value))
    }

    fn to_a(self, value: &Value) -> Result<Value> {
        match value {
            Value::Nil => Ok(Value::from(Vec::<Value>::new())),
            Value::Vec(_) => Ok(value.clone()),
            Value::Map(map) => Ok(map
                .iter()
                .map(|(k, v)| Value::from(vec![Value::from(k.clone()), v.clone()]))
                .collect()),
            _ => Err(self.unsupported(value)),
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn length(self, value: &Value) -> Result<Value> {
        let len = match value {
            Value::String(s) => s.chars().count(),
            Value::Vec(v) => v.len(),
            Value::Map(m) => m.len(),
            _ => return Err(self.unsupported(value)),
        };
        Ok(Value::Int(len as i64))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_i(value: &Value) -> Option<i64> {
    match value {
        Value::Nil => Some(0),
        Value::Int(n) => Some(*n),
        Value::Float(n) => Some(n.trunc() as i64),
        Value::String(s) => Some(
            LEADING_INT
                .find(s)
                .and_then(|m| m.as_str().trim_start().parse().ok())
                .unwrap_or(0),
        ),
        _ => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_f(value: &Value) -> Option<f64> {
    match value {
        Value::Nil => Some(0.0),
        Value::Int(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        Value::String(s) => Some(
            LEADING_FLOAT
                .find(s)
                .and_then(|m| m.as_str().trim_start().parse().ok())
                .unwrap_or(0.0),
        ),
        _ => None,
    }
}

/// Projects a value to plain data: records become maps, recursively.
///
/// # Errors
///
/// Propagates record projection failures.
pub fn as_json(value: &Value) -> Result<Value> {
    match value {
        Value::Record(record) => record.to_json().map(Value::Map),
        Value::Vec(items) => items
            .iter()
            .map(as_json)
            .collect::<Result<Vec<_>>>()
            .map(Value::from),
        Value::Map(map) => map
            .iter()
            .map(|(k, v)| Ok((Arc::clone(k), as_json(v)?)))
            .collect::<Result<ValueMap>>()
            .map(Value::Map),
        scalar => Ok(scalar.clone()),
    }
}

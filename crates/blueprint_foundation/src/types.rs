//! Composable type predicates for field validation.
//!
//! A [`Type`] is a small immutable expression tree. Leaves match a literal
//! (or a regular expression), or a runtime [`Class`]; inner nodes combine
//! predicates with a union or lift one over arrays.
//!
//! ```
//! use blueprint_foundation::{Type, Value};
//!
//! let maybe_name = Type::none() | Type::string();
//! assert!(maybe_name.matches(&Value::Nil));
//! assert!(maybe_name.check(&Value::Int(3)).is_err());
//! ```

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

use regex::Regex;

use crate::error::{Error, Result};
use crate::record::StructId;
use crate::value::Value;

// =============================================================================
// Classes
// =============================================================================

/// Runtime class used by instance-of predicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Class {
    /// Only `nil`.
    Nil,
    /// Booleans.
    Bool,
    /// Integers.
    Integer,
    /// Floats.
    Float,
    /// Integers and floats.
    Numeric,
    /// Strings.
    String,
    /// Sequences.
    Array,
    /// Keyed mappings.
    Hash,
    /// Every value.
    Object,
    /// Instances of a structure type or of any type descending from it.
    Struct(StructClass),
}

/// Class identity of a structure type.
#[derive(Clone, Debug)]
pub struct StructClass {
    /// Identity of the structure type.
    pub id: StructId,
    /// Display name of the structure type.
    pub name: Arc<str>,
}

impl PartialEq for StructClass {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StructClass {}

impl std::hash::Hash for StructClass {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Class {
    /// Creates the class of a structure type.
    #[must_use]
    pub fn structure(id: StructId, name: impl Into<Arc<str>>) -> Self {
        Self::Struct(StructClass {
            id,
            name: name.into(),
        })
    }

    /// Returns true if `value` is an instance of this class (or a subclass).
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Object, _)
            | (Self::Nil, Value::Nil)
            | (Self::Bool, Value::Bool(_))
            | (Self::Integer | Self::Numeric, Value::Int(_))
            | (Self::Float | Self::Numeric, Value::Float(_))
            | (Self::String, Value::String(_))
            | (Self::Array, Value::Vec(_))
            | (Self::Hash, Value::Map(_)) => true,
            (Self::Struct(class), Value::Record(record)) => record.is_a(class.id),
            _ => false,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "NilClass"),
            Self::Bool => write!(f, "Boolean"),
            Self::Integer => write!(f, "Integer"),
            Self::Float => write!(f, "Float"),
            Self::Numeric => write!(f, "Numeric"),
            Self::String => write!(f, "String"),
            Self::Array => write!(f, "Array"),
            Self::Hash => write!(f, "Hash"),
            Self::Object => write!(f, "Object"),
            Self::Struct(class) => write!(f, "{}", class.name),
        }
    }
}

// =============================================================================
// Literals
// =============================================================================

/// Regular expression literal, compared by source text.
#[derive(Clone, Debug)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns an argument error if `source` is not a valid regular expression.
    pub fn new(source: &str) -> Result<Self> {
        Regex::new(source)
            .map(Self)
            .map_err(|e| Error::argument(format!("invalid pattern /{source}/: {e}")))
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns true if `value` is a string matching the pattern.
    #[must_use]
    pub fn is_match(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| self.0.is_match(s))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// Right-hand side of a constant predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// Matches values equal to this one.
    Value(Value),
    /// Matches strings the pattern matches.
    Pattern(Pattern),
}

impl Literal {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Value(expected) => expected == value,
            Self::Pattern(pattern) => pattern.is_match(value),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:?}"),
            Self::Pattern(p) => write!(f, "/{}/", p.as_str()),
        }
    }
}

// =============================================================================
// Type predicates
// =============================================================================

/// Composable type predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    /// Matches a literal value or pattern.
    Const(Literal),
    /// Matches instances of a class.
    Instance(Class),
    /// Matches if either branch matches.
    Union(Box<Type>, Box<Type>),
    /// Matches arrays whose every element matches.
    ArrayOf(Box<Type>),
}

impl Type {
    /// Creates a predicate matching values equal to `value`.
    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Const(Literal::Value(value.into()))
    }

    /// Creates a predicate matching strings against a regular expression.
    ///
    /// # Errors
    ///
    /// Returns an argument error if the pattern does not compile.
    pub fn pattern(source: &str) -> Result<Self> {
        Pattern::new(source).map(|p| Self::Const(Literal::Pattern(p)))
    }

    /// Creates a predicate matching instances of `class`.
    #[must_use]
    pub fn instance_of(class: Class) -> Self {
        Self::Instance(class)
    }

    /// Creates a predicate matching arrays of `element`.
    #[must_use]
    pub fn array_of(element: Type) -> Self {
        Self::ArrayOf(Box::new(element))
    }

    /// Combines two predicates into a union.
    #[must_use]
    pub fn or(self, other: Type) -> Self {
        Self::Union(Box::new(self), Box::new(other))
    }

    /// Folds predicates into a left-nested union.
    ///
    /// Returns `None` for an empty input.
    pub fn any_of<I, T>(branches: I) -> Option<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Type>,
    {
        branches.into_iter().map(Into::into).reduce(Self::or)
    }

    /// `Instance[String]`.
    #[must_use]
    pub fn string() -> Self {
        Self::Instance(Class::String)
    }

    /// `Instance[Integer]`.
    #[must_use]
    pub fn integer() -> Self {
        Self::Instance(Class::Integer)
    }

    /// `Instance[Float]`.
    #[must_use]
    pub fn float() -> Self {
        Self::Instance(Class::Float)
    }

    /// `Instance[Numeric]`.
    #[must_use]
    pub fn numeric() -> Self {
        Self::Instance(Class::Numeric)
    }

    /// `Instance[Hash]`.
    #[must_use]
    pub fn hash() -> Self {
        Self::Instance(Class::Hash)
    }

    /// `Instance[Array]`.
    #[must_use]
    pub fn array() -> Self {
        Self::Instance(Class::Array)
    }

    /// `Instance[Object]`, matching everything.
    #[must_use]
    pub fn object() -> Self {
        Self::Instance(Class::Object)
    }

    /// `Const[true] | Const[false]`.
    #[must_use]
    pub fn boolean() -> Self {
        Self::constant(true) | Self::constant(false)
    }

    /// `Const[nil]`.
    #[must_use]
    pub fn none() -> Self {
        Self::constant(Value::Nil)
    }

    /// Returns true if `value` satisfies this predicate.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Const(literal) => literal.matches(value),
            Self::Instance(class) => class.contains(value),
            Self::Union(left, right) => left.matches(value) || right.matches(value),
            Self::ArrayOf(element) => value
                .as_vec()
                .is_some_and(|items| items.iter().all(|item| element.matches(item))),
        }
    }

    /// Checks `value`, describing every failed branch on mismatch.
    ///
    /// # Errors
    ///
    /// Returns a [`TypeError`] when the value does not satisfy the predicate.
    pub fn check(&self, value: &Value) -> std::result::Result<(), TypeError> {
        match self {
            Self::Const(literal) => {
                if literal.matches(value) {
                    Ok(())
                } else {
                    Err(TypeError::new(self, value, TypeErrorReason::NotEqual))
                }
            }
            Self::Instance(class) => {
                if class.contains(value) {
                    Ok(())
                } else {
                    Err(TypeError::new(self, value, TypeErrorReason::NotInstance))
                }
            }
            Self::ArrayOf(element) => {
                let Some(items) = value.as_vec() else {
                    return Err(TypeError::new(self, value, TypeErrorReason::NotArray));
                };
                for (index, item) in items.iter().enumerate() {
                    if let Err(source) = element.check(item) {
                        return Err(TypeError::new(
                            self,
                            value,
                            TypeErrorReason::Element {
                                index,
                                source: Box::new(source),
                            },
                        ));
                    }
                }
                Ok(())
            }
            Self::Union(..) => {
                let mut failures = Vec::new();
                for branch in self.branches() {
                    match branch.check(value) {
                        Ok(()) => return Ok(()),
                        Err(e) => failures.push(e),
                    }
                }
                Err(TypeError::new(
                    self,
                    value,
                    TypeErrorReason::NoBranch(failures),
                ))
            }
        }
    }

    /// Returns the union branches in declaration order.
    ///
    /// Nested unions are flattened; a non-union yields itself.
    #[must_use]
    pub fn branches(&self) -> Vec<&Type> {
        let mut out = Vec::new();
        self.collect_branches(&mut out);
        out
    }

    fn collect_branches<'a>(&'a self, out: &mut Vec<&'a Type>) {
        if let Self::Union(left, right) = self {
            left.collect_branches(out);
            right.collect_branches(out);
        } else {
            out.push(self);
        }
    }
}

impl BitOr for Type {
    type Output = Type;

    fn bitor(self, rhs: Type) -> Type {
        self.or(rhs)
    }
}

impl From<Class> for Type {
    fn from(class: Class) -> Self {
        Self::Instance(class)
    }
}

impl From<Value> for Type {
    fn from(value: Value) -> Self {
        Self::Const(Literal::Value(value))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(literal) => write!(f, "Const[{literal}]"),
            Self::Instance(class) => write!(f, "Instance[{class}]"),
            Self::Union(left, right) => write!(f, "{left} | {right}"),
            Self::ArrayOf(element) => write!(f, "ArrayOf[{element}]"),
        }
    }
}

// =============================================================================
// Type errors
// =============================================================================

/// Failure of a [`Type::check`].
#[derive(Clone, Debug, PartialEq)]
pub struct TypeError {
    /// Rendered predicate that failed.
    pub expected: String,
    /// Rendered value that was checked.
    pub actual: String,
    /// Why the check failed.
    pub reason: TypeErrorReason,
}

/// Reason a type check failed.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeErrorReason {
    /// The value differs from the literal (or does not match the pattern).
    NotEqual,
    /// The value is not an instance of the class.
    NotInstance,
    /// The value is not an array.
    NotArray,
    /// An array element failed.
    Element {
        /// Position of the first failing element.
        index: usize,
        /// The element's failure.
        source: Box<TypeError>,
    },
    /// Every union branch failed, in the order tried.
    NoBranch(Vec<TypeError>),
}

impl TypeError {
    fn new(expected: &Type, actual: &Value, reason: TypeErrorReason) -> Self {
        Self {
            expected: expected.to_string(),
            actual: format!("{actual:?}"),
            reason,
        }
    }

    /// Returns the innermost failure this one wraps.
    #[must_use]
    pub fn root_cause(&self) -> &TypeError {
        match &self.reason {
            TypeErrorReason::Element { source, .. } => source.root_cause(),
            TypeErrorReason::NoBranch(branches) => {
                branches.last().map_or(self, TypeError::root_cause)
            }
            _ => self,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match &self.reason {
            TypeErrorReason::NotEqual => {
                write!(f, "{indent}{} does not match {}", self.actual, self.expected)
            }
            TypeErrorReason::NotInstance => write!(
                f,
                "{indent}{} is not an instance of {}",
                self.actual, self.expected
            ),
            TypeErrorReason::NotArray => {
                write!(f, "{indent}{} is not an Array ({})", self.actual, self.expected)
            }
            TypeErrorReason::Element { index, source } => {
                writeln!(
                    f,
                    "{indent}element {index} of {} does not satisfy {}:",
                    self.actual, self.expected
                )?;
                source.render(f, depth + 1)
            }
            TypeErrorReason::NoBranch(branches) => {
                write!(
                    f,
                    "{indent}No type composition matches {} for {}:",
                    self.expected, self.actual
                )?;
                for branch in branches {
                    writeln!(f)?;
                    branch.render(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

impl std::error::Error for TypeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.reason {
            TypeErrorReason::Element { source, .. } => Some(source.as_ref()),
            TypeErrorReason::NoBranch(branches) => {
                branches.last().map(|e| e as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

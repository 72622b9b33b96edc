//! Error types for the Blueprint system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::types::TypeError;

/// The main error type for Blueprint operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

/// Result alias used throughout Blueprint.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Records the structure type an operation failed in, keeping any
    /// innermost context already present.
    #[must_use]
    pub fn in_structure(self, structure: &str) -> Self {
        if self.context.is_some() {
            return self;
        }
        self.with_context(ErrorContext::new().with_structure(structure))
    }

    /// Creates an invalid attribute name error.
    #[must_use]
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidName(name.into()))
    }

    /// Creates an invalid alias error.
    #[must_use]
    pub fn invalid_alias(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidAlias(name.into()))
    }

    /// Creates an argument error.
    #[must_use]
    pub fn argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Argument(message.into()))
    }

    /// Creates a missing required field error.
    #[must_use]
    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingField(name.into()))
    }

    /// Creates a structure coercion error.
    #[must_use]
    pub fn coercion(attribute: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Coercion {
            attribute: attribute.into(),
            detail: detail.into(),
        })
    }

    /// Creates an attribute type error wrapping a type check failure.
    #[must_use]
    pub fn attribute_type(attribute: impl Into<String>, source: TypeError) -> Self {
        Self::new(ErrorKind::AttributeType {
            attribute: attribute.into(),
            source,
        })
    }

    /// Returns true for naming errors.
    #[must_use]
    pub const fn is_naming(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidName(_) | ErrorKind::InvalidAlias(_) | ErrorKind::UnnamedAttribute
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Attribute name does not match the identifier pattern.
    #[error("invalid attribute name '{0}'")]
    InvalidName(String),

    /// Alias does not match the identifier pattern.
    #[error("invalid alias name '{0}'")]
    InvalidAlias(String),

    /// An attribute reached compilation without a name.
    #[error("attribute must have a name")]
    UnnamedAttribute,

    /// Malformed or mutually exclusive builder call.
    #[error("argument error: {0}")]
    Argument(String),

    /// Construction input omits a required attribute.
    #[error("'{0}' must be defined")]
    MissingField(String),

    /// Nested structure attribute received a non-coercible value.
    #[error("Error on attribute '{attribute}', detail:\n{detail}")]
    Coercion {
        /// Attribute being assigned.
        attribute: String,
        /// What could not be converted.
        detail: String,
    },

    /// Type predicate rejected the assigned value.
    #[error("Type error on attribute '{attribute}', detail:\n{source}")]
    AttributeType {
        /// Attribute being assigned.
        attribute: String,
        /// The composed type failure.
        source: TypeError,
    },

    /// Private accessor called from outside the instance.
    #[error("private {accessor} '{name}' called for {structure}")]
    PrivateAccess {
        /// Attribute or alias name.
        name: String,
        /// `getter` or `setter`.
        accessor: &'static str,
        /// Structure type of the instance.
        structure: String,
    },

    /// No attribute or alias with this name.
    #[error("undefined attribute '{name}' for {structure}")]
    UnknownAttribute {
        /// Requested name.
        name: String,
        /// Structure type of the instance.
        structure: String,
    },

    /// Named value method does not apply to this value.
    #[error("undefined method '{method}' for {class}")]
    UnsupportedMethod {
        /// Method name.
        method: String,
        /// Class of the receiver.
        class: String,
    },

    /// A lazily referenced structure type was never defined.
    #[error("uninitialized structure type '{0}'")]
    UnresolvedStructure(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Structure type being constructed or assigned.
    pub structure: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the structure type.
    #[must_use]
    pub fn with_structure(mut self, structure: impl Into<String>) -> Self {
        self.structure = Some(structure.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(structure) = &self.structure {
            write!(f, "in {structure}")?;
        }
        Ok(())
    }
}

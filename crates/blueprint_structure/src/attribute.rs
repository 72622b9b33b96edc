//! Attribute declarations.
//!
//! An [`Attribute`] is the data-driven description of one structure field.
//! Every configurable behavior is a closed sum type, so the compilers can
//! match on it once at definition time.

use std::fmt;
use std::sync::Arc;

use blueprint_foundation::{Error, Result, Type, Value, ValueMap, ValueMethod, ident};

use crate::registry::LazyStruct;
use crate::structure::StructType;

/// Maps a stored or incoming value.
pub type ValueFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Produces a default value on demand.
pub type Producer = Arc<dyn Fn() -> Value + Send + Sync>;

/// Writes zero or more keys of a serialized projection.
pub type Projector = Arc<dyn Fn(&mut ValueMap, &Value) + Send + Sync>;

// =============================================================================
// Configurable behaviors
// =============================================================================

/// Default of an attribute.
#[derive(Clone, Default)]
pub enum DefaultValue {
    /// No default: the attribute is required.
    #[default]
    Absent,
    /// A concrete value, cloned on use.
    Literal(Value),
    /// Evaluated each time a default is needed.
    Deferred(Producer),
}

impl DefaultValue {
    /// Creates a literal default.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Creates a deferred default.
    #[must_use]
    pub fn deferred(producer: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self::Deferred(Arc::new(producer))
    }

    /// Returns true if there is no default.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns true for a literal `nil` default.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Literal(Value::Nil))
    }

    /// Resolves the default, invoking a deferred producer.
    #[must_use]
    pub fn resolve(&self) -> Option<Value> {
        match self {
            Self::Absent => None,
            Self::Literal(value) => Some(value.clone()),
            Self::Deferred(producer) => Some(producer()),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "Absent"),
            Self::Literal(value) => write!(f, "Literal({value:?})"),
            Self::Deferred(_) => write!(f, "Deferred(<fn>)"),
        }
    }
}

/// Getter or setter transform.
#[derive(Clone, Default)]
pub enum Transform {
    /// Pass the value through.
    #[default]
    Identity,
    /// Apply a named value method.
    Method(ValueMethod),
    /// Apply a function.
    Function(ValueFn),
}

impl Transform {
    /// Resolves a named method transform.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an unknown method name.
    pub fn method(name: &str) -> Result<Self> {
        ValueMethod::parse(name).map(Self::Method)
    }

    /// Creates a function transform.
    #[must_use]
    pub fn function(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    /// Returns true for the identity transform.
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Applies the transform.
    ///
    /// # Errors
    ///
    /// Propagates a failing value method.
    pub fn apply(&self, value: &Value) -> Result<Value> {
        match self {
            Self::Identity => Ok(value.clone()),
            Self::Method(method) => method.apply(value),
            Self::Function(f) => Ok(f(value)),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "Identity"),
            Self::Method(method) => write!(f, "Method({method})"),
            Self::Function(_) => write!(f, "Function(<fn>)"),
        }
    }
}

/// Serialization behavior of an attribute.
#[derive(Clone, Default)]
pub enum AsJson {
    /// Left out of the projection.
    Excluded,
    /// Copied from the getter.
    #[default]
    Verbatim,
    /// Getter value passed through a named value method.
    Method(ValueMethod),
    /// Custom projector writing keys directly.
    Projector(Projector),
}

impl AsJson {
    /// Resolves a named method projection.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an unknown method name.
    pub fn method(name: &str) -> Result<Self> {
        ValueMethod::parse(name).map(Self::Method)
    }

    /// Creates a projector.
    #[must_use]
    pub fn projector(f: impl Fn(&mut ValueMap, &Value) + Send + Sync + 'static) -> Self {
        Self::Projector(Arc::new(f))
    }
}

impl From<bool> for AsJson {
    fn from(included: bool) -> Self {
        if included { Self::Verbatim } else { Self::Excluded }
    }
}

impl fmt::Debug for AsJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excluded => write!(f, "Excluded"),
            Self::Verbatim => write!(f, "Verbatim"),
            Self::Method(method) => write!(f, "Method({method})"),
            Self::Projector(_) => write!(f, "Projector(<fn>)"),
        }
    }
}

/// Accessor side for visibility settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The getter and presence predicate.
    Get,
    /// The setter.
    Set,
}

/// Reference to a nested structure type.
#[derive(Clone)]
pub enum Nested {
    /// A structure type already defined.
    Type(Arc<StructType>),
    /// A named type resolved on first use.
    Lazy(Arc<LazyStruct>),
}

impl Nested {
    /// Resolves the structure type.
    ///
    /// # Errors
    ///
    /// Returns an unresolved-structure error if a lazy name is not defined.
    pub fn resolve(&self) -> Result<Arc<StructType>> {
        match self {
            Self::Type(structure) => Ok(Arc::clone(structure)),
            Self::Lazy(lazy) => lazy.resolve(),
        }
    }

    /// Name of the referenced structure type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Type(structure) => structure.name(),
            Self::Lazy(lazy) => lazy.name(),
        }
    }
}

impl From<Arc<StructType>> for Nested {
    fn from(structure: Arc<StructType>) -> Self {
        Self::Type(structure)
    }
}

impl From<&Arc<StructType>> for Nested {
    fn from(structure: &Arc<StructType>) -> Self {
        Self::Type(Arc::clone(structure))
    }
}

impl fmt::Debug for Nested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(structure) => write!(f, "Type({})", structure.name()),
            Self::Lazy(lazy) => write!(f, "Lazy({})", lazy.name()),
        }
    }
}

// =============================================================================
// Attribute
// =============================================================================

/// Declarative description of one structure field.
#[derive(Clone, Debug)]
pub struct Attribute {
    pub(crate) name: Option<Arc<str>>,
    pub(crate) ty: Option<Type>,
    pub(crate) nested: Option<Nested>,
    pub(crate) array_struct: bool,
    pub(crate) default: DefaultValue,
    pub(crate) init: bool,
    pub(crate) get: Transform,
    pub(crate) set: Transform,
    pub(crate) private_get: bool,
    pub(crate) private_set: bool,
    pub(crate) as_json: AsJson,
    pub(crate) aliases: Vec<Arc<str>>,
}

impl Default for Attribute {
    fn default() -> Self {
        Self::new()
    }
}

impl Attribute {
    /// Creates an unnamed, required, public, initializable attribute.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            ty: None,
            nested: None,
            array_struct: false,
            default: DefaultValue::Absent,
            init: true,
            get: Transform::Identity,
            set: Transform::Identity,
            private_get: false,
            private_set: false,
            as_json: AsJson::Verbatim,
            aliases: Vec::new(),
        }
    }

    /// The attribute name, once set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the name.
    ///
    /// A trailing `?` marks the attribute optional: without an explicit
    /// default, the default becomes `nil`.
    ///
    /// # Errors
    ///
    /// Returns a naming error if the name (without `?`) is not an identifier.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let (name, optional) = match name.strip_suffix('?') {
            Some(stripped) => (stripped, true),
            None => (name, false),
        };
        let name = ident::attribute_name(name)?;
        if optional && self.default.is_absent() {
            self.default = DefaultValue::Literal(Value::Nil);
        }
        self.name = Some(name);
        Ok(())
    }

    /// The type predicate, if any.
    #[must_use]
    pub const fn ty(&self) -> Option<&Type> {
        self.ty.as_ref()
    }

    /// Sets the type predicate.
    ///
    /// # Errors
    ///
    /// Returns an argument error if a nested structure is already set.
    pub fn set_type(&mut self, ty: Type) -> Result<()> {
        if self.nested.is_some() {
            return Err(Error::argument(
                "attribute cannot have a type and a struct at the same time",
            ));
        }
        self.ty = Some(ty);
        Ok(())
    }

    /// The nested structure type, if any.
    #[must_use]
    pub const fn nested(&self) -> Option<&Nested> {
        self.nested.as_ref()
    }

    /// Sets a nested structure type.
    ///
    /// # Errors
    ///
    /// Returns an argument error if a type predicate is already set.
    pub fn set_nested(&mut self, nested: Nested) -> Result<()> {
        if self.ty.is_some() {
            return Err(Error::argument(
                "attribute cannot have a type and a struct at the same time",
            ));
        }
        self.nested = Some(nested);
        Ok(())
    }

    /// Sets a nested structure type holding an array of instances.
    ///
    /// # Errors
    ///
    /// Returns an argument error if a type predicate is already set.
    pub fn set_array_nested(&mut self, nested: Nested) -> Result<()> {
        self.set_nested(nested)?;
        self.array_struct = true;
        Ok(())
    }

    /// Returns true if the nested structure holds an array of instances.
    #[must_use]
    pub const fn is_array_struct(&self) -> bool {
        self.array_struct
    }

    /// The default.
    #[must_use]
    pub const fn default_value(&self) -> &DefaultValue {
        &self.default
    }

    /// Sets the default.
    pub fn set_default(&mut self, default: DefaultValue) {
        self.default = default;
    }

    /// Returns true if the attribute has a default.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        !self.default.is_absent()
    }

    /// Whether construction may set this attribute.
    #[must_use]
    pub const fn init(&self) -> bool {
        self.init
    }

    /// Sets whether construction may set this attribute.
    pub fn set_init(&mut self, init: bool) {
        self.init = init;
    }

    /// The getter transform.
    #[must_use]
    pub const fn getter(&self) -> &Transform {
        &self.get
    }

    /// Sets the getter transform.
    pub fn set_getter(&mut self, get: Transform) {
        self.get = get;
    }

    /// The setter transform.
    #[must_use]
    pub const fn setter(&self) -> &Transform {
        &self.set
    }

    /// Sets the setter transform.
    pub fn set_setter(&mut self, set: Transform) {
        self.set = set;
    }

    /// Whether the getter is private.
    #[must_use]
    pub const fn private_get(&self) -> bool {
        self.private_get
    }

    /// Sets whether the getter is private.
    pub fn set_private_get(&mut self, private: bool) {
        self.private_get = private;
    }

    /// Whether the setter is private.
    #[must_use]
    pub const fn private_set(&self) -> bool {
        self.private_set
    }

    /// Sets whether the setter is private.
    pub fn set_private_set(&mut self, private: bool) {
        self.private_set = private;
    }

    /// Returns true if the given side is private.
    #[must_use]
    pub const fn is_private(&self, side: Side) -> bool {
        match side {
            Side::Get => self.private_get,
            Side::Set => self.private_set,
        }
    }

    /// Serialization behavior.
    #[must_use]
    pub const fn as_json(&self) -> &AsJson {
        &self.as_json
    }

    /// Sets the serialization behavior.
    pub fn set_as_json(&mut self, as_json: AsJson) {
        self.as_json = as_json;
    }

    /// Returns true unless the attribute is excluded from serialization.
    #[must_use]
    pub const fn is_serialized(&self) -> bool {
        !matches!(self.as_json, AsJson::Excluded)
    }

    /// Additional accessor names.
    #[must_use]
    pub fn aliases(&self) -> &[Arc<str>] {
        &self.aliases
    }

    /// Replaces the aliases.
    ///
    /// # Errors
    ///
    /// Returns a naming error for the first alias that is not an identifier.
    pub fn set_aliases(&mut self, aliases: &[&str]) -> Result<()> {
        self.aliases = aliases
            .iter()
            .map(|alias| ident::alias_name(alias))
            .collect::<Result<_>>()?;
        Ok(())
    }
}

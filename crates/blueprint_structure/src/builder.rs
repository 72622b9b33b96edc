//! Fluent attribute declaration.
//!
//! An [`AttributeBuilder`] owns exactly one [`Attribute`] and mutates it
//! through chainable, validating calls:
//!
//! ```
//! use blueprint_structure::{AttributeBuilder, DefaultValue};
//! use blueprint_foundation::Type;
//!
//! let mut builder = AttributeBuilder::new();
//! builder
//!     .attr_with("count", Some(Type::integer()), DefaultValue::literal(0), |b| {
//!         b.get("to_s")?.alias(&["total"])?;
//!         Ok(())
//!     })
//!     .unwrap();
//! assert_eq!(builder.attribute().name(), Some("count"));
//! ```

use std::sync::Weak;

use blueprint_foundation::{Result, Type, Value, ValueMap};

use crate::attribute::{AsJson, Attribute, DefaultValue, Nested, Side, Transform};
use crate::context::AttributeScope;
use crate::defaults::Defaults;
use crate::registry::Registry;
use crate::structure::StructType;

/// Fluent declaration of a single attribute.
#[derive(Clone, Debug, Default)]
pub struct AttributeBuilder {
    attribute: Attribute,
    defaults: Defaults,
    registry: Option<Weak<Registry>>,
}

impl AttributeBuilder {
    /// Creates a builder around a fresh attribute.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Creates a builder whose attribute starts from `defaults`.
    #[must_use]
    pub fn with_defaults(defaults: Defaults) -> Self {
        let mut attribute = Attribute::new();
        defaults.apply(&mut attribute);
        Self {
            attribute,
            defaults,
            registry: None,
        }
    }

    /// Creates a builder that continues configuring `attribute`.
    #[must_use]
    pub fn from_attribute(attribute: Attribute) -> Self {
        Self {
            attribute,
            ..<Self as Default>::default()
        }
    }

    /// Registry used to resolve structure types declared inline.
    pub(crate) fn with_registry(mut self, registry: Option<Weak<Registry>>) -> Self {
        self.registry = registry;
        self
    }

    /// The attribute under construction.
    #[must_use]
    pub const fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    /// Consumes the builder, yielding its attribute.
    #[must_use]
    pub fn into_attribute(self) -> Attribute {
        self.attribute
    }

    // =========================================================================
    // Declaration
    // =========================================================================

    /// Names the attribute.
    ///
    /// # Errors
    ///
    /// Returns a naming error for an invalid name.
    pub fn attr(&mut self, name: &str) -> Result<&mut Self> {
        self.attr_with(name, None, DefaultValue::Absent, |_| Ok(()))
    }

    /// Names the attribute, sets its type and default, then runs `block`.
    ///
    /// The default is applied before the name, so a trailing `?` only
    /// implies `nil` when `default` is absent.
    ///
    /// # Errors
    ///
    /// Returns a naming error for an invalid name, or any error from `block`.
    pub fn attr_with<F>(
        &mut self,
        name: &str,
        ty: Option<Type>,
        default: DefaultValue,
        block: F,
    ) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.declare(ty, default)?;
        self.attribute.set_name(name)?;
        block(self)?;
        Ok(self)
    }

    /// Fans one declaration out over several names.
    ///
    /// Each name gets an independent copy of this builder's attribute, then
    /// the same type, default and block.
    ///
    /// # Errors
    ///
    /// Returns the first naming or block error.
    pub fn attrs<F>(
        &self,
        names: &[&str],
        ty: Option<Type>,
        default: DefaultValue,
        block: F,
    ) -> Result<Vec<Self>>
    where
        F: Fn(&mut Self) -> Result<()>,
    {
        names
            .iter()
            .map(|name| {
                let mut builder = self.clone();
                builder.attr_with(name, ty.clone(), default.clone(), &block)?;
                Ok(builder)
            })
            .collect()
    }

    /// Configures type and default without naming the attribute.
    ///
    /// # Errors
    ///
    /// Returns an argument error if a type conflicts with a nested structure.
    pub fn abstract_attr(&mut self, ty: Option<Type>, default: DefaultValue) -> Result<&mut Self> {
        self.declare(ty, default)?;
        Ok(self)
    }

    fn declare(&mut self, ty: Option<Type>, default: DefaultValue) -> Result<()> {
        if let Some(ty) = ty {
            self.attribute.set_type(ty)?;
        }
        if !default.is_absent() {
            self.attribute.set_default(default);
        }
        Ok(())
    }

    /// Makes the given sides private. An empty slice means both.
    pub fn private(&mut self, sides: &[Side]) -> &mut Self {
        let all = sides.is_empty();
        if all || sides.contains(&Side::Get) {
            self.attribute.set_private_get(true);
        }
        if all || sides.contains(&Side::Set) {
            self.attribute.set_private_set(true);
        }
        self
    }

    /// Renames the attribute.
    ///
    /// # Errors
    ///
    /// Returns a naming error for an invalid name.
    pub fn name(&mut self, name: &str) -> Result<&mut Self> {
        self.attribute.set_name(name)?;
        Ok(self)
    }

    /// Sets the type predicate.
    ///
    /// # Errors
    ///
    /// Returns an argument error if a nested structure is set.
    pub fn ty(&mut self, ty: Type) -> Result<&mut Self> {
        self.attribute.set_type(ty)?;
        Ok(self)
    }

    // =========================================================================
    // Nested structures
    // =========================================================================

    /// Holds an instance of an existing structure type.
    ///
    /// # Errors
    ///
    /// Returns an argument error if a type predicate is set.
    pub fn structure(&mut self, nested: impl Into<Nested>) -> Result<&mut Self> {
        self.attribute.set_nested(nested.into())?;
        Ok(self)
    }

    /// Holds an instance of an anonymous structure type defined by `block`.
    ///
    /// # Errors
    ///
    /// Returns an argument error if a type predicate is set, or any error
    /// from defining the nested type.
    pub fn structure_with<F>(&mut self, block: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut AttributeScope<'_>) -> Result<()>,
    {
        let nested = self.define_nested(block)?;
        self.attribute.set_nested(nested)?;
        Ok(self)
    }

    /// Holds an array of instances of an existing structure type.
    ///
    /// # Errors
    ///
    /// Returns an argument error if a type predicate is set.
    pub fn array_structure(&mut self, nested: impl Into<Nested>) -> Result<&mut Self> {
        self.attribute.set_array_nested(nested.into())?;
        Ok(self)
    }

    /// Holds an array of instances of an anonymous structure type.
    ///
    /// # Errors
    ///
    /// Returns an argument error if a type predicate is set, or any error
    /// from defining the nested type.
    pub fn array_structure_with<F>(&mut self, block: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut AttributeScope<'_>) -> Result<()>,
    {
        let nested = self.define_nested(block)?;
        self.attribute.set_array_nested(nested)?;
        Ok(self)
    }

    fn define_nested<F>(&self, block: F) -> Result<Nested>
    where
        F: FnOnce(&mut AttributeScope<'_>) -> Result<()>,
    {
        if self.attribute.ty().is_some() {
            return Err(blueprint_foundation::Error::argument(
                "attribute cannot have a type and a struct at the same time",
            ));
        }
        StructType::compile(None, None, self.registry.clone(), block).map(Nested::Type)
    }

    // =========================================================================
    // Defaults and initialization
    // =========================================================================

    /// Sets a literal default.
    pub fn default(&mut self, value: impl Into<Value>) -> &mut Self {
        self.attribute.set_default(DefaultValue::literal(value));
        self
    }

    /// Sets a default evaluated at each construction.
    pub fn default_with(&mut self, producer: impl Fn() -> Value + Send + Sync + 'static) -> &mut Self {
        self.attribute.set_default(DefaultValue::deferred(producer));
        self
    }

    /// Removes any default.
    pub fn required(&mut self) -> &mut Self {
        self.attribute.set_default(DefaultValue::Absent);
        self
    }

    /// Sets whether construction may set the attribute.
    pub fn init(&mut self, init: bool) -> &mut Self {
        self.attribute.set_init(init);
        self
    }

    // =========================================================================
    // Transforms and serialization
    // =========================================================================

    /// Transforms the stored value through a named method when read.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an unknown method.
    pub fn get(&mut self, method: &str) -> Result<&mut Self> {
        self.attribute.set_getter(Transform::method(method)?);
        Ok(self)
    }

    /// Transforms the stored value through `f` when read.
    pub fn get_with(&mut self, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> &mut Self {
        self.attribute.set_getter(Transform::function(f));
        self
    }

    /// Transforms the incoming value through a named method when set.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an unknown method.
    pub fn set(&mut self, method: &str) -> Result<&mut Self> {
        self.attribute.set_setter(Transform::method(method)?);
        Ok(self)
    }

    /// Transforms the incoming value through `f` when set.
    pub fn set_with(&mut self, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> &mut Self {
        self.attribute.set_setter(Transform::function(f));
        self
    }

    /// Includes or excludes the attribute from serialization.
    pub fn as_json(&mut self, included: bool) -> &mut Self {
        self.attribute.set_as_json(AsJson::from(included));
        self
    }

    /// Serializes the getter value through a named method.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an unknown method.
    pub fn as_json_method(&mut self, method: &str) -> Result<&mut Self> {
        self.attribute.set_as_json(AsJson::method(method)?);
        Ok(self)
    }

    /// Serializes through a projector writing keys directly.
    pub fn as_json_with(
        &mut self,
        projector: impl Fn(&mut ValueMap, &Value) + Send + Sync + 'static,
    ) -> &mut Self {
        self.attribute.set_as_json(AsJson::projector(projector));
        self
    }

    /// Replaces the aliases.
    ///
    /// # Errors
    ///
    /// Returns a naming error for an invalid alias.
    pub fn alias(&mut self, aliases: &[&str]) -> Result<&mut Self> {
        self.attribute.set_aliases(aliases)?;
        Ok(self)
    }

    /// Defaults this builder was created with.
    #[must_use]
    pub const fn defaults(&self) -> &Defaults {
        &self.defaults
    }
}

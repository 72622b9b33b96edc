//! Attribute collections.
//!
//! An [`AttributeContext`] gathers many attributes under shared
//! [`Defaults`]. An [`AttributeScope`] is what a structure definition block
//! receives: the same declaration surface, plus the owning structure's
//! identity and registry lookups. Both implement [`Declare`].

use std::sync::{Arc, Weak};

use blueprint_foundation::{Error, Result, Type};

use crate::attribute::{Attribute, DefaultValue, Nested, Side};
use crate::builder::AttributeBuilder;
use crate::defaults::Defaults;
use crate::registry::Registry;
use crate::structure::StructType;

/// Declaration surface shared by contexts and structure scopes.
///
/// Each call starts a new attribute seeded with the current defaults and
/// returns its builder for further configuration.
pub trait Declare {
    /// Declares an attribute by name.
    ///
    /// # Errors
    ///
    /// Returns a naming error for an invalid name.
    fn attr(&mut self, name: &str) -> Result<&mut AttributeBuilder>;

    /// Declares an attribute with a type, a default and a configuration block.
    ///
    /// # Errors
    ///
    /// Returns a naming error, or any error from `block`.
    fn attr_with<F>(
        &mut self,
        name: &str,
        ty: Option<Type>,
        default: DefaultValue,
        block: F,
    ) -> Result<&mut AttributeBuilder>
    where
        F: FnOnce(&mut AttributeBuilder) -> Result<()>;

    /// Declares one attribute per name with identical configuration.
    ///
    /// # Errors
    ///
    /// Returns the first naming or block error; nothing is added then.
    fn attrs<F>(
        &mut self,
        names: &[&str],
        ty: Option<Type>,
        default: DefaultValue,
        block: F,
    ) -> Result<&mut [AttributeBuilder]>
    where
        F: Fn(&mut AttributeBuilder) -> Result<()>;

    /// Starts an unnamed attribute with a type and default.
    ///
    /// # Errors
    ///
    /// Returns an argument error on a type conflict.
    fn abstract_attr(&mut self, ty: Option<Type>, default: DefaultValue) -> Result<&mut AttributeBuilder>;

    /// Starts an attribute that is private on the given sides (both if empty).
    fn private(&mut self, sides: &[Side]) -> &mut AttributeBuilder;

    /// Adds an independent copy of an existing attribute.
    fn using(&mut self, attribute: &Attribute) -> &mut AttributeBuilder;

    /// Replaces the defaults for attributes declared after this call.
    fn defaults(&mut self, defaults: Defaults);
}

// =============================================================================
// AttributeContext
// =============================================================================

/// Ordered collection of attribute builders under shared defaults.
#[derive(Clone, Debug, Default)]
pub struct AttributeContext {
    builders: Vec<AttributeBuilder>,
    defaults: Defaults,
    registry: Option<Weak<Registry>>,
}

impl AttributeContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty context whose attributes start from `defaults`.
    #[must_use]
    pub fn with_defaults(defaults: Defaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub(crate) fn with_registry(mut self, registry: Option<Weak<Registry>>) -> Self {
        self.registry = registry;
        self
    }

    /// Runs `block` against a fresh context and returns its attributes.
    ///
    /// # Errors
    ///
    /// Returns any error from `block`.
    pub fn scope<F>(block: F) -> Result<Vec<Attribute>>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let mut context = Self::new();
        block(&mut context)?;
        Ok(context.into_attributes())
    }

    /// Builders declared so far.
    #[must_use]
    pub fn builders(&self) -> &[AttributeBuilder] {
        &self.builders
    }

    /// Number of declared attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    /// Returns true if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Consumes the context, yielding attributes in declaration order.
    #[must_use]
    pub fn into_attributes(self) -> Vec<Attribute> {
        self.builders
            .into_iter()
            .map(AttributeBuilder::into_attribute)
            .collect()
    }

    fn builder(&self) -> AttributeBuilder {
        AttributeBuilder::with_defaults(self.defaults.clone()).with_registry(self.registry.clone())
    }

    fn push(&mut self, builder: AttributeBuilder) -> &mut AttributeBuilder {
        let index = self.builders.len();
        self.builders.push(builder);
        &mut self.builders[index]
    }
}

impl Declare for AttributeContext {
    fn attr(&mut self, name: &str) -> Result<&mut AttributeBuilder> {
        let mut builder = self.builder();
        builder.attr(name)?;
        Ok(self.push(builder))
    }

    fn attr_with<F>(
        &mut self,
        name: &str,
        ty: Option<Type>,
        default: DefaultValue,
        block: F,
    ) -> Result<&mut AttributeBuilder>
    where
        F: FnOnce(&mut AttributeBuilder) -> Result<()>,
    {
        let mut builder = self.builder();
        builder.attr_with(name, ty, default, block)?;
        Ok(self.push(builder))
    }

    fn attrs<F>(
        &mut self,
        names: &[&str],
        ty: Option<Type>,
        default: DefaultValue,
        block: F,
    ) -> Result<&mut [AttributeBuilder]>
    where
        F: Fn(&mut AttributeBuilder) -> Result<()>,
    {
        let built = self.builder().attrs(names, ty, default, block)?;
        let start = self.builders.len();
        self.builders.extend(built);
        Ok(&mut self.builders[start..])
    }

    fn abstract_attr(&mut self, ty: Option<Type>, default: DefaultValue) -> Result<&mut AttributeBuilder> {
        let mut builder = self.builder();
        builder.abstract_attr(ty, default)?;
        Ok(self.push(builder))
    }

    fn private(&mut self, sides: &[Side]) -> &mut AttributeBuilder {
        let mut builder = self.builder();
        builder.private(sides);
        self.push(builder)
    }

    fn using(&mut self, attribute: &Attribute) -> &mut AttributeBuilder {
        let builder = AttributeBuilder::from_attribute(attribute.clone()).with_registry(self.registry.clone());
        self.push(builder)
    }

    fn defaults(&mut self, defaults: Defaults) {
        self.defaults = defaults;
    }
}

// =============================================================================
// AttributeScope
// =============================================================================

/// Declaration scope handed to a structure definition block.
#[derive(Debug)]
pub struct AttributeScope<'a> {
    context: &'a mut AttributeContext,
    structure: Option<&'a str>,
    parent: Option<&'a Arc<StructType>>,
}

impl<'a> AttributeScope<'a> {
    pub(crate) fn new(
        context: &'a mut AttributeContext,
        structure: Option<&'a str>,
        parent: Option<&'a Arc<StructType>>,
    ) -> Self {
        Self {
            context,
            structure,
            parent,
        }
    }

    /// Name of the structure type being defined; `None` if anonymous.
    #[must_use]
    pub const fn structure_name(&self) -> Option<&str> {
        self.structure
    }

    /// Parent structure type, if this definition extends one.
    #[must_use]
    pub const fn parent(&self) -> Option<&Arc<StructType>> {
        self.parent
    }

    /// Attributes declared so far in this scope.
    #[must_use]
    pub fn builders(&self) -> &[AttributeBuilder] {
        self.context.builders()
    }

    /// References a structure type in the registry by name.
    ///
    /// The name is resolved on first use, so it may refer to a type that is
    /// defined later, including the one being defined.
    ///
    /// # Errors
    ///
    /// Returns an argument error if the definition has no registry.
    pub fn lookup(&self, name: &str) -> Result<Nested> {
        let registry = self
            .context
            .registry
            .as_ref()
            .ok_or_else(|| Error::argument(format!("cannot look up '{name}' without a registry")))?;
        Ok(Registry::lazy(registry.clone(), name))
    }
}

impl Declare for AttributeScope<'_> {
    fn attr(&mut self, name: &str) -> Result<&mut AttributeBuilder> {
        self.context.attr(name)
    }

    fn attr_with<F>(
        &mut self,
        name: &str,
        ty: Option<Type>,
        default: DefaultValue,
        block: F,
    ) -> Result<&mut AttributeBuilder>
    where
        F: FnOnce(&mut AttributeBuilder) -> Result<()>,
    {
        self.context.attr_with(name, ty, default, block)
    }

    fn attrs<F>(
        &mut self,
        names: &[&str],
        ty: Option<Type>,
        default: DefaultValue,
        block: F,
    ) -> Result<&mut [AttributeBuilder]>
    where
        F: Fn(&mut AttributeBuilder) -> Result<()>,
    {
        self.context.attrs(names, ty, default, block)
    }

    fn abstract_attr(&mut self, ty: Option<Type>, default: DefaultValue) -> Result<&mut AttributeBuilder> {
        self.context.abstract_attr(ty, default)
    }

    fn private(&mut self, sides: &[Side]) -> &mut AttributeBuilder {
        self.context.private(sides)
    }

    fn using(&mut self, attribute: &Attribute) -> &mut AttributeBuilder {
        self.context.using(attribute)
    }

    fn defaults(&mut self, defaults: Defaults) {
        self.context.defaults(defaults);
    }
}

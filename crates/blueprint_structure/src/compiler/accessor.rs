//! Accessor compilation.
//!
//! Each attribute compiles to a [`CompiledAccessor`]: a getter transform
//! and a flat list of setter steps decided once, from the attribute's
//! configuration, rather than re-inspected on every assignment.

use std::sync::Arc;

use blueprint_foundation::{Error, Result, Type, Value};

use crate::attribute::{Attribute, Nested, Side, Transform};

/// One stage of a compiled setter.
#[derive(Clone, Debug)]
pub enum SetStep {
    /// Transform the incoming value.
    Transform(Transform),
    /// Store `nil` directly, skipping every later step.
    AcceptNil,
    /// Coerce a mapping into the nested structure type.
    Coerce(Nested),
    /// Coerce each element of an array into the nested structure type.
    CoerceEach(Nested),
    /// Check the value against the type predicate.
    Check(Type),
}

/// Compiled getter and setter for one attribute.
#[derive(Clone, Debug)]
pub struct CompiledAccessor {
    name: Arc<str>,
    slot: usize,
    getter: Transform,
    setter: Vec<SetStep>,
    private_get: bool,
    private_set: bool,
    aliases: Vec<Arc<str>>,
}

impl CompiledAccessor {
    /// Compiles the accessor for `attribute`, stored at `slot`.
    #[must_use]
    pub fn compile(name: Arc<str>, slot: usize, attribute: &Attribute) -> Self {
        let mut setter = Vec::new();

        if !attribute.setter().is_identity() {
            setter.push(SetStep::Transform(attribute.setter().clone()));
        }

        let constrained = attribute.ty().is_some() || attribute.nested().is_some();
        if constrained && attribute.default_value().is_nil() {
            setter.push(SetStep::AcceptNil);
        }

        if let Some(nested) = attribute.nested() {
            setter.push(if attribute.is_array_struct() {
                SetStep::CoerceEach(nested.clone())
            } else {
                SetStep::Coerce(nested.clone())
            });
        }

        if let Some(ty) = attribute.ty() {
            setter.push(SetStep::Check(ty.clone()));
        }

        Self {
            name,
            slot,
            getter: attribute.getter().clone(),
            setter,
            private_get: attribute.private_get(),
            private_set: attribute.private_set(),
            aliases: attribute.aliases().to_vec(),
        }
    }

    /// Canonical attribute name.
    #[must_use]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// Slot index in an instance.
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.slot
    }

    /// Aliases sharing this accessor.
    #[must_use]
    pub fn aliases(&self) -> &[Arc<str>] {
        &self.aliases
    }

    /// Compiled setter steps, in execution order.
    #[must_use]
    pub fn setter_steps(&self) -> &[SetStep] {
        &self.setter
    }

    /// Returns true if the given side is private.
    #[must_use]
    pub const fn is_private(&self, side: Side) -> bool {
        match side {
            Side::Get => self.private_get,
            Side::Set => self.private_set,
        }
    }

    /// Applies the getter transform to a stored value.
    ///
    /// # Errors
    ///
    /// Propagates a failing value method.
    pub fn read(&self, stored: &Value) -> Result<Value> {
        self.getter.apply(stored)
    }

    /// Runs the setter pipeline and returns the value to store.
    ///
    /// # Errors
    ///
    /// Returns a coercion error or an attribute type error naming this
    /// attribute, or propagates a failing transform.
    pub fn prepare(&self, value: Value) -> Result<Value> {
        let mut value = value;
        for step in &self.setter {
            value = match step {
                SetStep::Transform(transform) => transform.apply(&value)?,
                SetStep::AcceptNil if value.is_nil() => return Ok(value),
                SetStep::AcceptNil => value,
                SetStep::Coerce(nested) => coerce(&self.name, nested, value)?,
                SetStep::CoerceEach(nested) => coerce_each(&self.name, nested, value)?,
                SetStep::Check(ty) => {
                    ty.check(&value)
                        .map_err(|e| Error::attribute_type(self.name.as_ref(), e))?;
                    value
                }
            };
        }
        Ok(value)
    }
}

fn coerce(name: &str, nested: &Nested, value: Value) -> Result<Value> {
    let target = nested.resolve()?;
    if value.as_record().is_some_and(|record| record.is_a(target.id())) {
        return Ok(value);
    }
    match value {
        Value::Map(map) => target.construct(&map).map(Value::from),
        other => Err(Error::coercion(
            name,
            format!("no implicit conversion of {} into Hash", other.class_name()),
        )),
    }
}

fn coerce_each(name: &str, nested: &Nested, value: Value) -> Result<Value> {
    let Value::Vec(items) = value else {
        return Err(Error::coercion(
            name,
            format!("no implicit conversion of {} into Array", value.class_name()),
        ));
    };
    items
        .into_iter()
        .map(|item| coerce(name, nested, item))
        .collect::<Result<Vec<_>>>()
        .map(Value::from)
}

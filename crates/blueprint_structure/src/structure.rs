//! Structure types.
//!
//! A [`StructType`] is defined by a block that declares attributes on an
//! [`AttributeScope`]. Definition derives the schema, compiles every
//! accessor and both plans, and freezes the result behind an `Arc`.
//!
//! ```
//! use blueprint_structure::{Declare, DefaultValue, StructType};
//! use blueprint_foundation::{Type, Value, value_map};
//!
//! let point = StructType::define("Point", |s| {
//!     s.attrs(&["x", "y"], Some(Type::integer()), DefaultValue::literal(0), |_| Ok(()))?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let p = point.construct(&value_map! { "x" => 3 }).unwrap();
//! assert_eq!(p.get("x").unwrap(), Value::Int(3));
//! assert_eq!(p.get("y").unwrap(), Value::Int(0));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use tracing::{debug, trace};

use blueprint_foundation::{Class, Result, StructId, ValueMap};

use crate::compiler::{CompiledAccessor, ConstructorPlan, SerializerPlan};
use crate::context::{AttributeContext, AttributeScope};
use crate::instance::Instance;
use crate::registry::Registry;
use crate::schema::Schema;

/// A compiled structure type.
pub struct StructType {
    id: StructId,
    name: Arc<str>,
    anonymous: bool,
    parent: Option<Arc<StructType>>,
    ancestors: Vec<StructId>,
    schema: Schema,
    accessors: Vec<CompiledAccessor>,
    lookup: HashMap<Arc<str>, usize>,
    constructor: ConstructorPlan,
    serializer: SerializerPlan,
    registry: Option<Weak<Registry>>,
}

impl StructType {
    // =========================================================================
    // Definition
    // =========================================================================

    /// Defines a named root structure type.
    ///
    /// # Errors
    ///
    /// Returns any declaration error from `block`, or an unnamed-attribute
    /// error if an abstract attribute was never named.
    pub fn define<F>(name: &str, block: F) -> Result<Arc<Self>>
    where
        F: FnOnce(&mut AttributeScope<'_>) -> Result<()>,
    {
        Self::compile(Some(name), None, None, block)
    }

    /// Defines an anonymous root structure type.
    ///
    /// # Errors
    ///
    /// See [`StructType::define`].
    pub fn anonymous<F>(block: F) -> Result<Arc<Self>>
    where
        F: FnOnce(&mut AttributeScope<'_>) -> Result<()>,
    {
        Self::compile(None, None, None, block)
    }

    /// Defines a structure type inheriting this one's attributes.
    ///
    /// # Errors
    ///
    /// See [`StructType::define`].
    pub fn extend<F>(self: &Arc<Self>, name: &str, block: F) -> Result<Arc<Self>>
    where
        F: FnOnce(&mut AttributeScope<'_>) -> Result<()>,
    {
        Self::compile(Some(name), Some(self), None, block)
    }

    pub(crate) fn compile<F>(
        name: Option<&str>,
        parent: Option<&Arc<Self>>,
        registry: Option<Weak<Registry>>,
        block: F,
    ) -> Result<Arc<Self>>
    where
        F: FnOnce(&mut AttributeScope<'_>) -> Result<()>,
    {
        let id = StructId::next();
        let display: Arc<str> = name.map_or_else(|| Arc::from(format!("<anonymous {id}>")), Arc::from);
        let registry = registry.or_else(|| parent.and_then(|p| p.registry.clone()));

        Self::assemble(id, Arc::clone(&display), name.is_none(), parent, registry, block)
            .map_err(|e| e.in_structure(&display))
    }

    fn assemble<F>(
        id: StructId,
        name: Arc<str>,
        anonymous: bool,
        parent: Option<&Arc<Self>>,
        registry: Option<Weak<Registry>>,
        block: F,
    ) -> Result<Arc<Self>>
    where
        F: FnOnce(&mut AttributeScope<'_>) -> Result<()>,
    {
        let mut context = AttributeContext::new().with_registry(registry.clone());
        block(&mut AttributeScope::new(&mut context, (!anonymous).then_some(&*name), parent))?;

        let schema = Schema::derive(parent.map(|p| &p.schema), context.into_attributes())?;

        let mut accessors = Vec::with_capacity(schema.len());
        let mut lookup = HashMap::new();
        for (slot, (attr_name, attribute)) in schema.iter().enumerate() {
            let accessor = CompiledAccessor::compile(Arc::clone(attr_name), slot, attribute);
            trace!(
                structure = %name,
                attribute = %attr_name,
                steps = accessor.setter_steps().len(),
                "compiled accessor"
            );
            for alias in accessor.aliases() {
                lookup.entry(Arc::clone(alias)).or_insert(slot);
            }
            accessors.push(accessor);
        }
        for (slot, attr_name) in schema.names().enumerate() {
            lookup.insert(Arc::clone(attr_name), slot);
        }

        let constructor = ConstructorPlan::compile(&schema, parent.map(|p| &p.constructor));
        let serializer = SerializerPlan::compile(&schema, parent.map(|p| &p.serializer));

        let mut ancestors = parent.map(|p| p.ancestors.clone()).unwrap_or_default();
        ancestors.push(id);

        debug!(
            structure = %name,
            id = id.get(),
            parent = parent.map(|p| p.name()),
            attributes = schema.len(),
            own = schema.own_names().len(),
            "compiled structure type"
        );

        Ok(Arc::new(Self {
            id,
            name,
            anonymous,
            parent: parent.cloned(),
            ancestors,
            schema,
            accessors,
            lookup,
            constructor,
            serializer,
            registry,
        }))
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Unique identity.
    #[must_use]
    pub const fn id(&self) -> StructId {
        self.id
    }

    /// Display name; anonymous types get a generated one.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the type was defined without a name.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Parent type, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    /// Attribute schema, including inherited attributes.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Class usable in type predicates; matches instances of this type and
    /// of its descendants.
    #[must_use]
    pub fn class(&self) -> Class {
        Class::structure(self.id, Arc::clone(&self.name))
    }

    /// Returns true if this type is `other` or descends from it.
    #[must_use]
    pub fn is_subtype_of(&self, other: &Self) -> bool {
        self.descends_from(other.id)
    }

    pub(crate) fn descends_from(&self, id: StructId) -> bool {
        self.ancestors.contains(&id)
    }

    /// Compiled construction plan.
    #[must_use]
    pub const fn constructor(&self) -> &ConstructorPlan {
        &self.constructor
    }

    /// Compiled serialization plan.
    #[must_use]
    pub const fn serializer(&self) -> &SerializerPlan {
        &self.serializer
    }

    /// Compiled accessors in field order.
    #[must_use]
    pub fn accessors(&self) -> &[CompiledAccessor] {
        &self.accessors
    }

    /// Accessor for an attribute name or alias.
    #[must_use]
    pub fn accessor(&self, name: &str) -> Option<&CompiledAccessor> {
        self.lookup.get(name).map(|&slot| &self.accessors[slot])
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Constructs an instance from a keyed mapping.
    ///
    /// Private setters are allowed during construction. Keys that match no
    /// initializable attribute are ignored.
    ///
    /// # Errors
    ///
    /// Returns a missing-field error, or any setter error, with this type
    /// as context.
    pub fn construct(self: &Arc<Self>, input: &ValueMap) -> Result<Instance> {
        let mut instance = Instance::blank(Arc::clone(self));
        self.constructor
            .run(input, |slot, value| instance.assign(slot, value))
            .map_err(|e| e.in_structure(&self.name))?;
        Ok(instance)
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("attributes", &self.schema.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

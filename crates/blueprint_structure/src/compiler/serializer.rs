//! Serialization compilation.
//!
//! A [`SerializerPlan`] projects an instance to a plain keyed mapping.
//! Every step reads the attribute through its getter transform, without
//! visibility checks.

use std::sync::Arc;

use blueprint_foundation::{Result, Value, ValueMap, ValueMethod, methods};

use crate::attribute::{AsJson, Projector};
use crate::schema::Schema;

/// Projection of one attribute.
#[derive(Clone)]
pub enum JsonStep {
    /// Nested instances (or arrays of them) are projected recursively.
    Nested {
        /// Attribute name and output key.
        name: Arc<str>,
        /// Slot index.
        slot: usize,
    },
    /// Getter value copied as is.
    Verbatim {
        /// Attribute name and output key.
        name: Arc<str>,
        /// Slot index.
        slot: usize,
    },
    /// Getter value passed through a named method.
    Method {
        /// Attribute name and output key.
        name: Arc<str>,
        /// Slot index.
        slot: usize,
        /// Method applied to the getter value.
        method: ValueMethod,
    },
    /// Projector writing keys of its choosing.
    Projector {
        /// Attribute name.
        name: Arc<str>,
        /// Slot index.
        slot: usize,
        /// The projector.
        projector: Projector,
    },
}

impl JsonStep {
    /// Attribute name this step projects.
    #[must_use]
    pub fn name(&self) -> &Arc<str> {
        match self {
            Self::Nested { name, .. }
            | Self::Verbatim { name, .. }
            | Self::Method { name, .. }
            | Self::Projector { name, .. } => name,
        }
    }

    const fn slot(&self) -> usize {
        match self {
            Self::Nested { slot, .. }
            | Self::Verbatim { slot, .. }
            | Self::Method { slot, .. }
            | Self::Projector { slot, .. } => *slot,
        }
    }

    fn with_slot(&self, slot: usize) -> Self {
        let mut step = self.clone();
        match &mut step {
            Self::Nested { slot: s, .. }
            | Self::Verbatim { slot: s, .. }
            | Self::Method { slot: s, .. }
            | Self::Projector { slot: s, .. } => *s = slot,
        }
        step
    }
}

impl std::fmt::Debug for JsonStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nested { name, .. } => write!(f, "Nested({name})"),
            Self::Verbatim { name, .. } => write!(f, "Verbatim({name})"),
            Self::Method { name, method, .. } => write!(f, "Method({name}, {method})"),
            Self::Projector { name, .. } => write!(f, "Projector({name})"),
        }
    }
}

/// Ordered projection steps for one structure type.
#[derive(Clone, Debug, Default)]
pub struct SerializerPlan {
    steps: Vec<JsonStep>,
}

impl SerializerPlan {
    /// Compiles the plan for `schema`, extending `parent`'s plan.
    ///
    /// An overridden attribute keeps its inherited position; attributes new
    /// to this type follow the inherited ones.
    #[must_use]
    pub fn compile(schema: &Schema, parent: Option<&Self>) -> Self {
        let mut steps = Vec::new();
        let mut emitted: Vec<&Arc<str>> = Vec::new();
        for step in parent.into_iter().flat_map(|p| p.steps.iter()) {
            if schema.is_own(step.name()) {
                if let Some(own) = own_step(schema, step.name()) {
                    steps.push(own);
                }
                emitted.push(step.name());
            } else if let Some(slot) = schema.position(step.name()) {
                steps.push(step.with_slot(slot));
            }
        }

        for name in schema.own_names() {
            if emitted.contains(&name) {
                continue;
            }
            steps.extend(own_step(schema, name));
        }

        Self { steps }
    }

    /// Steps in output order.
    #[must_use]
    pub fn steps(&self) -> &[JsonStep] {
        &self.steps
    }

    /// Runs the plan; `read` returns the getter value of a slot.
    ///
    /// # Errors
    ///
    /// Propagates failures from `read`, value methods or nested projection.
    pub fn run<F>(&self, read: F) -> Result<ValueMap>
    where
        F: Fn(usize) -> Result<Value>,
    {
        let mut out = ValueMap::with_capacity(self.steps.len());
        for step in &self.steps {
            let value = read(step.slot())?;
            match step {
                JsonStep::Nested { name, .. } => {
                    out.insert(Arc::clone(name), methods::as_json(&value)?);
                }
                JsonStep::Verbatim { name, .. } => {
                    out.insert(Arc::clone(name), value);
                }
                JsonStep::Method { name, method, .. } => {
                    out.insert(Arc::clone(name), method.apply(&value)?);
                }
                JsonStep::Projector { projector, .. } => projector(&mut out, &value),
            }
        }
        Ok(out)
    }
}

/// Step for an attribute declared by `schema` itself, or `None` if excluded.
fn own_step(schema: &Schema, name: &Arc<str>) -> Option<JsonStep> {
    let attribute = schema.get(name)?;
    let slot = schema.position(name)?;
    let name = Arc::clone(name);
    let step = match attribute.as_json() {
        AsJson::Excluded => return None,
        _ if attribute.nested().is_some() => JsonStep::Nested { name, slot },
        AsJson::Verbatim => JsonStep::Verbatim { name, slot },
        AsJson::Method(method) => JsonStep::Method {
            name,
            slot,
            method: *method,
        },
        AsJson::Projector(projector) => JsonStep::Projector {
            name,
            slot,
            projector: Arc::clone(projector),
        },
    };
    Some(step)
}

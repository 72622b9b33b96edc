//! Constructor compilation.
//!
//! A [`ConstructorPlan`] lists, per attribute, how construction fills it
//! from an input mapping. A derived type's plan is its parent's plan
//! without the names it redeclares, followed by its own steps.

use std::sync::Arc;

use blueprint_foundation::{Error, Result, Value, ValueMap};

use crate::attribute::DefaultValue;
use crate::schema::Schema;

/// How construction fills one attribute.
#[derive(Clone, Debug)]
pub enum InitStep {
    /// The key must be present.
    Required {
        /// Attribute name.
        name: Arc<str>,
        /// Slot index.
        slot: usize,
    },
    /// Uses the key if present, otherwise the default.
    Optional {
        /// Attribute name.
        name: Arc<str>,
        /// Slot index.
        slot: usize,
        /// Fallback when the key is absent.
        default: DefaultValue,
    },
    /// Ignores the input and always uses the default.
    DefaultOnly {
        /// Attribute name.
        name: Arc<str>,
        /// Slot index.
        slot: usize,
        /// The value source.
        default: DefaultValue,
    },
}

impl InitStep {
    /// Attribute name this step fills.
    #[must_use]
    pub fn name(&self) -> &Arc<str> {
        match self {
            Self::Required { name, .. } | Self::Optional { name, .. } | Self::DefaultOnly { name, .. } => name,
        }
    }

    fn with_slot(&self, slot: usize) -> Self {
        let mut step = self.clone();
        match &mut step {
            Self::Required { slot: s, .. } | Self::Optional { slot: s, .. } | Self::DefaultOnly { slot: s, .. } => {
                *s = slot;
            }
        }
        step
    }
}

/// Ordered construction steps for one structure type.
#[derive(Clone, Debug, Default)]
pub struct ConstructorPlan {
    steps: Vec<InitStep>,
}

impl ConstructorPlan {
    /// Compiles the plan for `schema`, extending `parent`'s plan.
    #[must_use]
    pub fn compile(schema: &Schema, parent: Option<&Self>) -> Self {
        let mut steps: Vec<InitStep> = parent
            .into_iter()
            .flat_map(|p| p.steps.iter())
            .filter(|step| !schema.is_own(step.name()))
            .filter_map(|step| schema.position(step.name()).map(|slot| step.with_slot(slot)))
            .collect();

        for name in schema.own_names() {
            let (Some(attribute), Some(slot)) = (schema.get(name), schema.position(name)) else {
                continue;
            };
            let name = Arc::clone(name);
            let default = attribute.default_value().clone();
            let step = match (attribute.init(), default.is_absent()) {
                (true, true) => InitStep::Required { name, slot },
                (true, false) => InitStep::Optional { name, slot, default },
                (false, false) => InitStep::DefaultOnly { name, slot, default },
                (false, true) => continue,
            };
            steps.push(step);
        }

        Self { steps }
    }

    /// Steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[InitStep] {
        &self.steps
    }

    /// Runs the plan, handing each resolved value to `assign`.
    ///
    /// Keys in `input` without a step are ignored.
    ///
    /// # Errors
    ///
    /// Returns a missing-field error for the first absent required key, or
    /// propagates the first error from `assign`.
    pub fn run<F>(&self, input: &ValueMap, mut assign: F) -> Result<()>
    where
        F: FnMut(usize, Value) -> Result<()>,
    {
        for step in &self.steps {
            match step {
                InitStep::Required { name, slot } => {
                    let value = input
                        .get(name.as_ref())
                        .cloned()
                        .ok_or_else(|| Error::missing_field(name.as_ref()))?;
                    assign(*slot, value)?;
                }
                InitStep::Optional { name, slot, default } => {
                    let value = match input.get(name.as_ref()) {
                        Some(value) => value.clone(),
                        None => default.resolve().unwrap_or_default(),
                    };
                    assign(*slot, value)?;
                }
                InitStep::DefaultOnly { slot, default, .. } => {
                    assign(*slot, default.resolve().unwrap_or_default())?;
                }
            }
        }
        Ok(())
    }
}

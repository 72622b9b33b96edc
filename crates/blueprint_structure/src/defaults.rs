//! Builder-wide attribute defaults.
//!
//! [`Defaults`] seeds every attribute a builder or context starts. Unset
//! fields leave the attribute's own defaults untouched.

use blueprint_foundation::{Error, Result, Type, Value, ValueMap};

use crate::attribute::{AsJson, Attribute, DefaultValue, Transform};

/// Options applied to each new attribute before its declaration runs.
#[derive(Clone, Debug, Default)]
pub struct Defaults {
    ty: Option<Type>,
    default: Option<DefaultValue>,
    init: Option<bool>,
    private_get: Option<bool>,
    private_set: Option<bool>,
    get: Option<Transform>,
    set: Option<Transform>,
    as_json: Option<AsJson>,
}

impl Defaults {
    /// Creates empty defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Private on both sides and excluded from serialization.
    #[must_use]
    pub fn hidden() -> Self {
        Self::new().with_private(true).with_as_json(AsJson::Excluded)
    }

    /// Not settable through construction; starts as `nil`.
    #[must_use]
    pub fn computed() -> Self {
        Self::new()
            .with_init(false)
            .with_default(DefaultValue::Literal(Value::Nil))
    }

    /// Sets the type predicate.
    #[must_use]
    pub fn with_type(mut self, ty: Type) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Sets the default.
    #[must_use]
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the init flag.
    #[must_use]
    pub const fn with_init(mut self, init: bool) -> Self {
        self.init = Some(init);
        self
    }

    /// Sets getter visibility.
    #[must_use]
    pub const fn with_private_get(mut self, private: bool) -> Self {
        self.private_get = Some(private);
        self
    }

    /// Sets setter visibility.
    #[must_use]
    pub const fn with_private_set(mut self, private: bool) -> Self {
        self.private_set = Some(private);
        self
    }

    /// Sets both visibilities.
    #[must_use]
    pub const fn with_private(self, private: bool) -> Self {
        self.with_private_get(private).with_private_set(private)
    }

    /// Sets the getter transform.
    #[must_use]
    pub fn with_getter(mut self, get: Transform) -> Self {
        self.get = Some(get);
        self
    }

    /// Sets the setter transform.
    #[must_use]
    pub fn with_setter(mut self, set: Transform) -> Self {
        self.set = Some(set);
        self
    }

    /// Sets the serialization behavior.
    #[must_use]
    pub fn with_as_json(mut self, as_json: AsJson) -> Self {
        self.as_json = Some(as_json);
        self
    }

    /// Returns true if no option is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ty.is_none()
            && self.default.is_none()
            && self.init.is_none()
            && self.private_get.is_none()
            && self.private_set.is_none()
            && self.get.is_none()
            && self.set.is_none()
            && self.as_json.is_none()
    }

    /// Reads defaults from a keyed mapping.
    ///
    /// Recognized keys are `default`, `init`, `private`, `private_get`,
    /// `private_set`, `get`, `set` and `as_json`. Flags must be booleans;
    /// `get` and `set` name value methods; `as_json` is a boolean or a
    /// method name.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an unknown key, a non-boolean flag, or
    /// an unknown method name.
    pub fn from_map(map: &ValueMap) -> Result<Self> {
        let mut defaults = Self::new();
        for (key, value) in map {
            match key.as_ref() {
                "default" => defaults.default = Some(DefaultValue::Literal(value.clone())),
                "init" => defaults.init = Some(flag(key, value)?),
                "private" => {
                    let private = flag(key, value)?;
                    defaults.private_get = Some(private);
                    defaults.private_set = Some(private);
                }
                "private_get" => defaults.private_get = Some(flag(key, value)?),
                "private_set" => defaults.private_set = Some(flag(key, value)?),
                "get" => defaults.get = Some(Transform::method(method_name(key, value)?)?),
                "set" => defaults.set = Some(Transform::method(method_name(key, value)?)?),
                "as_json" => {
                    defaults.as_json = Some(match value {
                        Value::Bool(included) => AsJson::from(*included),
                        _ => AsJson::method(method_name(key, value)?)?,
                    });
                }
                other => {
                    return Err(Error::argument(format!("unknown attribute option '{other}'")));
                }
            }
        }
        Ok(defaults)
    }

    /// Writes every set option onto `attribute`.
    pub(crate) fn apply(&self, attribute: &mut Attribute) {
        if let Some(ty) = &self.ty {
            attribute.ty = Some(ty.clone());
        }
        if let Some(default) = &self.default {
            attribute.default = default.clone();
        }
        if let Some(init) = self.init {
            attribute.init = init;
        }
        if let Some(private) = self.private_get {
            attribute.private_get = private;
        }
        if let Some(private) = self.private_set {
            attribute.private_set = private;
        }
        if let Some(get) = &self.get {
            attribute.get = get.clone();
        }
        if let Some(set) = &self.set {
            attribute.set = set.clone();
        }
        if let Some(as_json) = &self.as_json {
            attribute.as_json = as_json.clone();
        }
    }
}

fn flag(key: &str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| {
        Error::argument(format!(
            "option '{key}' expects a Boolean, got {}",
            value.class_name()
        ))
    })
}

fn method_name<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
    value.as_str().ok_or_else(|| {
        Error::argument(format!(
            "option '{key}' expects a method name, got {}",
            value.class_name()
        ))
    })
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Defaults {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = <ValueMap as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_map(&map).map_err(serde::de::Error::custom)
    }
}

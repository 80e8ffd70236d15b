use crate::error::ConvertError;

/// Parameter type of a converter setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Bool,
    I64,
    U64,
    F64,
    Str,
}

/// Declaration of a single converter setting.
///
/// Converters publish these so that a `ConfigValues` can be checked before
/// construction.
#[derive(Debug, Clone)]
pub struct ConfigParam {
    pub name: &'static str,
    pub param_type: ParamType,
    pub required: bool,
    /// Raw default, in the same text form as an assignment's right-hand side.
    pub default: Option<&'static str>,
    pub description: &'static str,
}

/// Typed config value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
}

impl ParamValue {
    /// Parse `raw` (e.g. the right-hand side of `key=value`) as `ty`.
    pub fn parse(ty: ParamType, raw: &str) -> Result<Self, ConvertError> {
        let bad = |e: &dyn std::fmt::Display| {
            ConvertError::Config(format!("cannot parse '{raw}' as {ty:?}: {e}"))
        };
        Ok(match ty {
            ParamType::Bool => ParamValue::Bool(raw.parse().map_err(|e| bad(&e))?),
            ParamType::I64 => ParamValue::I64(raw.parse().map_err(|e| bad(&e))?),
            ParamType::U64 => ParamValue::U64(raw.parse().map_err(|e| bad(&e))?),
            ParamType::F64 => ParamValue::F64(raw.parse().map_err(|e| bad(&e))?),
            ParamType::Str => ParamValue::Str(raw.to_string()),
        })
    }

    fn fits(&self, ty: ParamType) -> bool {
        matches!(
            (self, ty),
            (ParamValue::Bool(_), ParamType::Bool)
                | (ParamValue::I64(_), ParamType::I64)
                | (ParamValue::U64(_), ParamType::U64)
                | (ParamValue::I64(0..), ParamType::U64)
                | (ParamValue::F64(_), ParamType::F64)
                | (ParamValue::Str(_), ParamType::Str)
        )
    }
}

/// Opaque converter settings, passed at construction time.
///
/// Empty by default; every converter works with no settings at all.
/// Keys keep insertion order; setting an existing key replaces its value.
#[derive(Debug, Clone, Default)]
pub struct ConfigValues {
    entries: Vec<(String, ParamValue)>,
}

impl ConfigValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous value of `name`, which keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) -> Option<ParamValue> {
        let name = name.into();
        match self.entries.iter().position(|(k, _)| *k == name) {
            Some(at) => Some(std::mem::replace(&mut self.entries[at].1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.set(name, value);
        self
    }

    /// Parse `key=value` assignments, typing each value by its declaration.
    pub fn from_assignments<'s>(
        assignments: impl IntoIterator<Item = &'s str>,
        params: &[ConfigParam],
    ) -> Result<Self, ConvertError> {
        let mut values = Self::new();
        for assignment in assignments {
            let (key, raw) = assignment.split_once('=').ok_or_else(|| {
                ConvertError::Config(format!("expected key=value, got '{assignment}'"))
            })?;
            let key = key.trim();
            let param = params
                .iter()
                .find(|p| p.name == key)
                .ok_or_else(|| ConvertError::Config(format!("unknown setting '{key}'")))?;
            values.set(key, ParamValue::parse(param.param_type, raw.trim())?);
        }
        Ok(values)
    }

    /// Reject unknown keys, mistyped values and missing required keys.
    pub fn validate(&self, params: &[ConfigParam]) -> Result<(), ConvertError> {
        for (name, value) in &self.entries {
            let param = params
                .iter()
                .find(|p| p.name == name)
                .ok_or_else(|| ConvertError::Config(format!("unknown setting '{name}'")))?;
            if !value.fits(param.param_type) {
                return Err(ConvertError::Config(format!(
                    "setting '{name}' expects {:?}, got {value:?}",
                    param.param_type
                )));
            }
        }
        for param in params.iter().filter(|p| p.required) {
            if self.get(param.name).is_none() {
                return Err(ConvertError::Config(format!(
                    "missing required setting '{}'",
                    param.name
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Str(v)) => Some(v),
            _ => None,
        }
    }
}

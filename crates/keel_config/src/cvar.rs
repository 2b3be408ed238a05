//! Configuration variable values and typed definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag of a cvar value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CVarKind {
    Float,
    Int,
    Bool,
}

impl fmt::Display for CVarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CVarKind::Float => "float",
            CVarKind::Int => "int",
            CVarKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A stored cvar value.
///
/// Serialized untagged so the config file stays a flat `name -> value` map.
/// Variant order matters for deserialization: `1` parses as `Int`, `1.0` as `Float`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CVarValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl CVarValue {
    pub fn kind(&self) -> CVarKind {
        match self {
            CVarValue::Float(_) => CVarKind::Float,
            CVarValue::Int(_) => CVarKind::Int,
            CVarValue::Bool(_) => CVarKind::Bool,
        }
    }

    /// Convert into `kind` where that is lossless.
    ///
    /// Integers widen to floats (a hand-edited `"audio.mastervolume": 1`);
    /// everything else must already match.
    pub fn coerce(self, kind: CVarKind) -> Option<CVarValue> {
        match (self, kind) {
            (value, kind) if value.kind() == kind => Some(value),
            (CVarValue::Int(v), CVarKind::Float) => Some(CVarValue::Float(v as f32)),
            _ => None,
        }
    }
}

impl fmt::Display for CVarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CVarValue::Float(v) => write!(f, "{v}"),
            CVarValue::Int(v) => write!(f, "{v}"),
            CVarValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Rust types that can be stored in a cvar.
pub trait CVarType: Copy + Sized {
    const KIND: CVarKind;

    fn into_value(self) -> CVarValue;
    fn from_value(value: CVarValue) -> Option<Self>;
}

impl CVarType for f32 {
    const KIND: CVarKind = CVarKind::Float;

    fn into_value(self) -> CVarValue {
        CVarValue::Float(self)
    }

    fn from_value(value: CVarValue) -> Option<Self> {
        match value.coerce(CVarKind::Float)? {
            CVarValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl CVarType for i32 {
    const KIND: CVarKind = CVarKind::Int;

    fn into_value(self) -> CVarValue {
        CVarValue::Int(self)
    }

    fn from_value(value: CVarValue) -> Option<Self> {
        match value {
            CVarValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl CVarType for bool {
    const KIND: CVarKind = CVarKind::Bool;

    fn into_value(self) -> CVarValue {
        CVarValue::Bool(self)
    }

    fn from_value(value: CVarValue) -> Option<Self> {
        match value {
            CVarValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

/// A named cvar with its default value.
#[derive(Debug, Copy, Clone)]
pub struct CVarDef<T: CVarType> {
    pub name: &'static str,
    pub default: T,
}

impl<T: CVarType> CVarDef<T> {
    pub const fn new(name: &'static str, default: T) -> Self {
        Self { name, default }
    }

    pub fn default_value(&self) -> CVarValue {
        self.default.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_parse_picks_kind() {
        let map: std::collections::BTreeMap<String, CVarValue> =
            serde_json::from_str(r#"{"a": true, "b": 16, "c": 0.5}"#).unwrap();
        assert_eq!(map["a"], CVarValue::Bool(true));
        assert_eq!(map["b"], CVarValue::Int(16));
        assert_eq!(map["c"], CVarValue::Float(0.5));
    }

    #[test]
    fn test_int_widens_to_float() {
        assert_eq!(f32::from_value(CVarValue::Int(1)), Some(1.0));
        assert_eq!(i32::from_value(CVarValue::Float(1.0)), None);
        assert_eq!(bool::from_value(CVarValue::Int(1)), None);
    }
}

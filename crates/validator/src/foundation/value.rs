//! Dynamic value model
//!
//! Schemas validate [`Value`], a JSON-shaped tree with one extra variant:
//! [`Value::Undefined`] models an absent member or a hole in a sparse array.
//! Values convert losslessly from `serde_json::Value` and serialize back to
//! JSON (undefined renders as `null`).

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Insertion-ordered object members.
pub type Map = IndexMap<String, Value>;

static UNDEFINED: Value = Value::Undefined;

/// A dynamically typed value under validation.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value (missing member, sparse hole).
    #[default]
    Undefined,
    /// JSON `null`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number. All numbers are IEEE-754 doubles.
    Number(f64),
    /// Text.
    String(String),
    /// Dense sequence of values.
    Array(Vec<Value>),
    /// Insertion-ordered object.
    Object(Map),
}

impl Value {
    /// Returns `true` for [`Value::Undefined`].
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for arrays.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the elements if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the text if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number as a non-negative safe integer (`0..=2^53-1`).
    #[must_use]
    pub fn as_safe_index(&self) -> Option<usize> {
        const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

        match self {
            Self::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= MAX_SAFE_INTEGER => {
                Some(*n as usize)
            }
            _ => None,
        }
    }

    /// Follows a dot-separated member path (`"a.b.0"`).
    ///
    /// Object members are looked up by name and array elements by index.
    /// A missing segment yields [`Value::Undefined`]; an empty path yields
    /// the value itself.
    #[must_use]
    pub fn reach(&self, path: &str) -> &Value {
        if path.is_empty() {
            return self;
        }

        let mut current = self;
        for segment in path.split('.') {
            current = match current {
                Self::Object(map) => map.get(segment),
                Self::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            }
            .unwrap_or(&UNDEFINED);
        }
        current
    }

    /// Converts to `serde_json::Value`. Undefined becomes `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

/// Structural equality.
///
/// Arrays compare element-wise, objects by member set regardless of order.
/// `NaN` equals `NaN` and `0` equals `-0`.
#[must_use]
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| deep_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| y.get(k).is_some_and(|other| deep_equal(v, other)))
        }
        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        deep_equal(self, other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Object(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

/// `None` maps to [`Value::Undefined`], which makes sparse arrays easy to
/// spell: `Value::from(vec![Some(1), None, Some(3)])`.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_from_json() {
        let value = Value::from(json!({"a": [1, "x", null, true]}));
        assert_eq!(value.reach("a.0"), &Value::Number(1.0));
        assert_eq!(value.reach("a.1"), &Value::from("x"));
        assert_eq!(value.reach("a.2"), &Value::Null);
        assert!(value.reach("a.9").is_undefined());
        assert!(value.reach("b.c").is_undefined());
    }

    #[test]
    fn empty_path_reaches_self() {
        let value = Value::from(json!([1]));
        assert_eq!(value.reach(""), &value);
    }

    #[test]
    fn deep_equal_ignores_member_order() {
        let a = Value::from(json!({"a": 1, "b": [1, 2]}));
        let b = Value::from(json!({"b": [1, 2], "a": 1}));
        assert_eq!(a, b);
        assert_ne!(a, Value::from(json!({"a": 1, "b": [2, 1]})));
    }

    #[test]
    fn nan_and_signed_zero() {
        assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_eq!(Value::Number(0.0), Value::Number(-0.0));
    }

    #[test]
    fn undefined_is_distinct_from_null() {
        assert_ne!(Value::Undefined, Value::Null);
        assert_eq!(Value::Undefined.to_json(), serde_json::Value::Null);
        assert_eq!(Value::Undefined.to_string(), "undefined");
    }

    #[test]
    fn sparse_arrays_from_options() {
        let value = Value::from(vec![Some(1), None, Some(3)]);
        let items = value.as_array().unwrap();
        assert!(items[1].is_undefined());
        assert_eq!(value.to_json(), json!([1, null, 3]));
    }

    #[test]
    fn safe_index() {
        assert_eq!(Value::from(3).as_safe_index(), Some(3));
        assert_eq!(Value::from(-1).as_safe_index(), None);
        assert_eq!(Value::Number(1.5).as_safe_index(), None);
        assert_eq!(Value::from("3").as_safe_index(), None);
    }
}

//! Duplicate detection.
//!
//! One seen-set per check. Scalars (undefined, null, booleans, numbers, text)
//! are looked up by hash; arrays and objects are compared by a linear
//! deep-equality scan over the compound values seen so far. A custom
//! comparator is never hashed: every value is scanned against all previous
//! ones with it.

use crate::foundation::{ErrorCode, State, ValidationError, Value, deep_equal};
use crate::iterate::iterate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

type Comparator = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// What two elements are compared by.
#[derive(Clone)]
pub enum UniqueBy {
    /// The whole element, by deep equality.
    Deep,
    /// The member at a dot-separated path, by deep equality.
    Path(String),
    /// The whole element, by a user comparator.
    Custom(Comparator),
}

impl fmt::Debug for UniqueBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deep => f.write_str("Deep"),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Settings of a uniqueness rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UniqueOptions {
    /// Elements whose compared value is undefined never collide.
    pub ignore_undefined: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct UniqueRule {
    by: UniqueBy,
    ignore_undefined: bool,
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum ScalarKey<'v> {
    Undefined,
    Null,
    Bool(bool),
    Number(u64),
    String(&'v str),
}

impl<'v> ScalarKey<'v> {
    fn of(value: &'v Value) -> Option<Self> {
        Some(match value {
            Value::Undefined => Self::Undefined,
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(number_bits(*n)),
            Value::String(s) => Self::String(s),
            Value::Array(_) | Value::Object(_) => return None,
        })
    }
}

/// Bit pattern under which equal numbers collide: `0 == -0`, `NaN == NaN`.
fn number_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0
    } else {
        n.to_bits()
    }
}

#[derive(Default)]
struct SeenSet<'v> {
    scalars: HashMap<ScalarKey<'v>, usize>,
    compound: Vec<(&'v Value, usize)>,
}

impl<'v> SeenSet<'v> {
    /// Position of an earlier equal value, recording `value` if there is none.
    fn check(&mut self, value: &'v Value, pos: usize, comparator: Option<&Comparator>) -> Option<usize> {
        if let Some(compare) = comparator {
            return self.scan(value, pos, |a, b| compare(a, b));
        }
        match ScalarKey::of(value) {
            Some(key) => match self.scalars.get(&key) {
                Some(&first) => Some(first),
                None => {
                    self.scalars.insert(key, pos);
                    None
                }
            },
            None => self.scan(value, pos, deep_equal),
        }
    }

    fn scan(
        &mut self,
        value: &'v Value,
        pos: usize,
        equal: impl Fn(&Value, &Value) -> bool,
    ) -> Option<usize> {
        if let Some(&(_, first)) = self.compound.iter().find(|(seen, _)| equal(seen, value)) {
            return Some(first);
        }
        self.compound.push((value, pos));
        None
    }
}

impl UniqueRule {
    pub(crate) fn new(by: UniqueBy, options: UniqueOptions) -> Self {
        Self {
            by,
            ignore_undefined: options.ignore_undefined,
        }
    }

    fn compared<'v>(&self, item: &'v Value) -> &'v Value {
        match &self.by {
            UniqueBy::Path(path) => item.reach(path),
            UniqueBy::Deep | UniqueBy::Custom(_) => item,
        }
    }

    pub(crate) fn check(&self, items: &[Value], state: &State<'_>) -> Result<(), ValidationError> {
        let comparator = match &self.by {
            UniqueBy::Custom(compare) => Some(compare),
            _ => None,
        };
        let mut seen = SeenSet::default();

        let flow = iterate(items, |_, pos, _| {
            let compared = self.compared(&items[pos]);
            if self.ignore_undefined && compared.is_undefined() {
                return ControlFlow::Continue(());
            }
            match seen.check(compared, pos, comparator) {
                Some(first) => ControlFlow::Break((pos, first)),
                None => ControlFlow::Continue(()),
            }
        });

        let ControlFlow::Break((pos, first)) = flow else {
            return Ok(());
        };

        let mut error = ValidationError::new(ErrorCode::ArrayUnique)
            .at(&state.child(pos))
            .with_key(state.key.clone())
            .with_param("pos", pos)
            .with_param("value", items[pos].clone())
            .with_param("dupePos", first)
            .with_param("dupeValue", items[first].clone());
        if let UniqueBy::Path(path) = &self.by {
            error = error.with_param("path", path.as_str());
        }
        Err(error)
    }

    pub(crate) fn describe(&self) -> serde_json::Value {
        let mut arg = serde_json::Map::new();
        arg.insert("ignoreUndefined".into(), self.ignore_undefined.into());
        match &self.by {
            UniqueBy::Deep => {}
            UniqueBy::Path(path) => {
                arg.insert("path".into(), path.as_str().into());
            }
            UniqueBy::Custom(_) => {
                arg.insert("comparator".into(), "custom".into());
            }
        }
        serde_json::Value::Object(arg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ValidateExt;
    use crate::schema::array;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn scalars_collide_by_kind() {
        let schema = array().unique();
        assert!(schema.validate(json!([1, "1", true, null])).is_ok());

        let errors = schema.validate(json!(["a", "b", "a"])).unwrap_err();
        assert_eq!(errors[0].code, ErrorCode::ArrayUnique);
        assert_eq!(errors[0].param("pos"), Some(&Value::from(2)));
        assert_eq!(errors[0].param("dupePos"), Some(&Value::from(0)));
        assert_eq!(errors[0].path_string(), "2");
    }

    #[test]
    fn signed_zero_and_nan_collide() {
        let schema = array().unique();
        assert!(schema.validate(vec![0.0, -0.0]).is_err());
        assert!(schema.validate(vec![f64::NAN, f64::NAN]).is_err());
    }

    #[test]
    fn deep_equal_compounds() {
        let schema = array().unique();
        let errors = schema.validate(json!([{"a": 1}, {"a": 1}])).unwrap_err();
        assert_eq!(errors[0].param("dupePos"), Some(&Value::from(0)));
        assert_eq!(errors[0].param("pos"), Some(&Value::from(1)));

        assert!(schema.validate(json!([{"a": 1}, {"a": 2}])).is_ok());
        assert!(schema.validate(json!([[1], [1, 2]])).is_ok());
    }

    #[test]
    fn first_seen_wins() {
        let errors = array()
            .unique()
            .validate(json!([3, 1, 3, 3]))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].param("pos"), Some(&Value::from(2)));
        assert_eq!(errors[0].param("dupePos"), Some(&Value::from(0)));
    }

    #[test]
    fn by_path() {
        let schema = array().unique_by("a");
        let errors = schema
            .validate(json!([{"a": 1, "b": 1}, {"a": 1, "b": 2}]))
            .unwrap_err();
        assert_eq!(errors[0].param("path"), Some(&Value::from("a")));
        assert!(schema.validate(json!([{"a": 1}, {"a": 2}])).is_ok());
    }

    #[test]
    fn ignore_undefined() {
        let value = json!([{"b": 1}, {"b": 2}]);
        assert!(array().unique_by("a").validate(value.clone()).is_err());

        let schema = array().unique_with_options(
            UniqueBy::Path("a".into()),
            UniqueOptions {
                ignore_undefined: true,
            },
        );
        assert!(schema.validate(value).is_ok());
    }

    #[test]
    fn custom_comparator() {
        let schema = array().unique_with(|a, b| {
            a.reach("id").as_f64().map(f64::trunc) == b.reach("id").as_f64().map(f64::trunc)
        });
        let errors = schema
            .validate(json!([{"id": 1.2}, {"id": 2}, {"id": 1.9}]))
            .unwrap_err();
        assert_eq!(errors[0].param("pos"), Some(&Value::from(2)));
        assert_eq!(errors[0].param("dupePos"), Some(&Value::from(0)));
    }
}

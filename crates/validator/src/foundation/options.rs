//! Validation options
//!
//! Options are plain serde data so they can be loaded from configuration
//! files alongside schema descriptions:
//!
//! ```rust,ignore
//! let options: ValidationOptions = serde_json::from_str(
//!     r#"{ "abortEarly": false, "stripUnknown": { "arrays": true } }"#,
//! )?;
//! ```

use crate::foundation::value::Value;
use serde::{Deserialize, Serialize};

/// Per-call validation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Stop at the first error instead of collecting all of them.
    pub abort_early: bool,

    /// Allow type coercion (text to array/number/boolean, single wrapping).
    pub convert: bool,

    /// Silently drop unmatched elements or members.
    pub strip_unknown: StripUnknown,

    /// Caller-provided data that `$`-prefixed references resolve against.
    pub context: Value,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            abort_early: true,
            convert: true,
            strip_unknown: StripUnknown::default(),
            context: Value::Undefined,
        }
    }
}

impl ValidationOptions {
    /// Options with every behavior switched off.
    ///
    /// Exclusion checks run under these so that a forbidden pattern is
    /// matched as written, without coercion.
    #[must_use]
    pub fn bare() -> Self {
        Self {
            abort_early: false,
            convert: false,
            strip_unknown: StripUnknown::default(),
            context: Value::Undefined,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_abort_early(mut self, abort_early: bool) -> Self {
        self.abort_early = abort_early;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_convert(mut self, convert: bool) -> Self {
        self.convert = convert;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_strip_unknown(mut self, strip_unknown: impl Into<StripUnknown>) -> Self {
        self.strip_unknown = strip_unknown.into();
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_context(mut self, context: impl Into<Value>) -> Self {
        self.context = context.into();
        self
    }
}

/// Which containers drop unknown content.
///
/// Accepts either a boolean (`true` applies to arrays) or a selector
/// `{ "arrays": bool, "objects": bool }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StripUnknownRepr", into = "StripUnknownRepr")]
pub struct StripUnknown {
    pub arrays: bool,
    pub objects: bool,
}

impl StripUnknown {
    /// Strip unmatched array elements only.
    #[must_use]
    pub const fn arrays() -> Self {
        Self {
            arrays: true,
            objects: false,
        }
    }
}

impl From<bool> for StripUnknown {
    fn from(flag: bool) -> Self {
        Self {
            arrays: flag,
            objects: false,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StripUnknownRepr {
    Flag(bool),
    Selector {
        #[serde(default)]
        arrays: bool,
        #[serde(default)]
        objects: bool,
    },
}

impl From<StripUnknownRepr> for StripUnknown {
    fn from(repr: StripUnknownRepr) -> Self {
        match repr {
            StripUnknownRepr::Flag(flag) => flag.into(),
            StripUnknownRepr::Selector { arrays, objects } => Self { arrays, objects },
        }
    }
}

impl From<StripUnknown> for StripUnknownRepr {
    fn from(value: StripUnknown) -> Self {
        Self::Selector {
            arrays: value.arrays,
            objects: value.objects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let options = ValidationOptions::default();
        assert!(options.abort_early);
        assert!(options.convert);
        assert!(!options.strip_unknown.arrays);
        assert!(options.context.is_undefined());
    }

    #[test]
    fn deserializes_partial_camel_case() {
        let options: ValidationOptions =
            serde_json::from_value(json!({"abortEarly": false, "context": {"n": 2}})).unwrap();
        assert!(!options.abort_early);
        assert!(options.convert);
        assert_eq!(options.context.reach("n"), &Value::from(2));
    }

    #[test]
    fn strip_unknown_accepts_flag_or_selector() {
        let flag: StripUnknown = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(flag, StripUnknown::arrays());

        let selector: StripUnknown = serde_json::from_value(json!({"objects": true})).unwrap();
        assert!(!selector.arrays);
        assert!(selector.objects);

        assert_eq!(
            serde_json::to_value(StripUnknown::arrays()).unwrap(),
            json!({"arrays": true, "objects": false})
        );
    }
}

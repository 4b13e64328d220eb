//! Late-bound references and numeric limits.
//!
//! A [`Reference`] names a value that is only known at validation time:
//! either a sibling member (resolved against the enclosing container) or a
//! member of the caller-supplied context (`$`-prefixed paths).

use crate::foundation::error::SchemaError;
use crate::foundation::options::ValidationOptions;
use crate::foundation::state::State;
use crate::foundation::value::Value;
use std::fmt;

static UNRESOLVED: Value = Value::Undefined;

/// Where a reference is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefScope {
    /// The container of the validated value.
    Parent,
    /// [`ValidationOptions::context`].
    Context,
}

/// A reference to a value resolved at validation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    scope: RefScope,
    path: String,
}

impl Reference {
    /// Sibling reference, e.g. `Reference::new("limit")`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            scope: RefScope::Parent,
            path: path.into(),
        }
    }

    /// Context reference.
    #[must_use]
    pub fn context(path: impl Into<String>) -> Self {
        Self {
            scope: RefScope::Context,
            path: path.into(),
        }
    }

    /// Parses the shorthand form: a leading `$` selects the context.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        key.strip_prefix('$')
            .map_or_else(|| Self::new(key), Self::context)
    }

    #[must_use]
    pub fn scope(&self) -> RefScope {
        self.scope
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Descriptor form used in schema descriptions: `ref:path` or
    /// `context:path`.
    #[must_use]
    pub fn descriptor(&self) -> String {
        self.to_string()
    }

    /// Parses a descriptor produced by [`Reference::descriptor`].
    pub fn from_descriptor(descriptor: &str) -> Result<Self, SchemaError> {
        if let Some(path) = descriptor.strip_prefix("ref:") {
            Ok(Self::new(path))
        } else if let Some(path) = descriptor.strip_prefix("context:") {
            Ok(Self::context(path))
        } else {
            Err(SchemaError::InvalidReference(descriptor.to_owned()))
        }
    }

    /// Resolves against the current state.
    ///
    /// Missing targets resolve to [`Value::Undefined`].
    #[must_use]
    pub fn resolve<'v>(&self, state: &State<'v>, options: &'v ValidationOptions) -> &'v Value {
        match self.scope {
            RefScope::Parent => state
                .reference_root()
                .map_or(&UNRESOLVED, |root| root.reach(&self.path)),
            RefScope::Context => options.context.reach(&self.path),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            RefScope::Parent => write!(f, "ref:{}", self.path),
            RefScope::Context => write!(f, "context:{}", self.path),
        }
    }
}

/// A count limit: a literal or a reference to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Limit {
    Value(usize),
    Ref(Reference),
}

impl Limit {
    /// Resolves to a concrete count.
    ///
    /// `None` when a reference does not point at a non-negative safe
    /// integer.
    #[must_use]
    pub fn resolve(&self, state: &State<'_>, options: &ValidationOptions) -> Option<usize> {
        match self {
            Self::Value(n) => Some(*n),
            Self::Ref(reference) => reference.resolve(state, options).as_safe_index(),
        }
    }

    /// JSON form used in descriptions.
    #[must_use]
    pub fn describe(&self) -> serde_json::Value {
        match self {
            Self::Value(n) => serde_json::Value::from(*n),
            Self::Ref(reference) => serde_json::Value::String(reference.descriptor()),
        }
    }
}

impl From<usize> for Limit {
    fn from(n: usize) -> Self {
        Self::Value(n)
    }
}

impl From<Reference> for Limit {
    fn from(reference: Reference) -> Self {
        Self::Ref(reference)
    }
}

/// A sibling path, or a context path when prefixed with `$`.
impl From<&str> for Limit {
    fn from(key: &str) -> Self {
        Self::Ref(Reference::parse(key))
    }
}

impl TryFrom<&serde_json::Value> for Limit {
    type Error = SchemaError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Number(n) => n
                .as_u64()
                .filter(|n| *n <= 9_007_199_254_740_991)
                .and_then(|n| usize::try_from(n).ok())
                .map(Self::Value)
                .ok_or_else(|| SchemaError::InvalidLimit(value.to_string())),
            serde_json::Value::String(s) => Reference::from_descriptor(s)
                .map(Self::Ref)
                .map_err(|_| SchemaError::InvalidLimit(value.to_string())),
            other => Err(SchemaError::InvalidLimit(other.to_string())),
        }
    }
}

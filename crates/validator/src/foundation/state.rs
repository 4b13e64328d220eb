//! Per-call validation state: where in the document the current value sits.

use crate::foundation::value::Value;
use std::fmt;

/// One step of a path from the document root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Array position.
    Index(usize),
    /// Object member name.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => f.write_str(k),
        }
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<&PathSegment> for Value {
    fn from(segment: &PathSegment) -> Self {
        match segment {
            PathSegment::Index(i) => Value::from(*i),
            PathSegment::Key(k) => Value::from(k.as_str()),
        }
    }
}

/// Location and surroundings of the value being validated.
///
/// `parent` is the container the value lives in and is what sibling
/// references resolve against. `reference` overrides it for elements of an
/// array, which resolve references against the array's own parent.
#[derive(Debug, Clone, Default)]
pub struct State<'a> {
    /// Key of the value within its container.
    pub key: Option<PathSegment>,
    /// Path from the document root.
    pub path: Vec<PathSegment>,
    /// Containing value.
    pub parent: Option<&'a Value>,
    /// Value references resolve against, when different from `parent`.
    pub reference: Option<&'a Value>,
}

impl<'a> State<'a> {
    /// State of a top-level value.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Sets the containing value.
    #[must_use]
    pub fn with_parent(mut self, parent: &'a Value) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the value references resolve against.
    #[must_use]
    pub fn with_reference(mut self, reference: &'a Value) -> Self {
        self.reference = Some(reference);
        self
    }

    /// State of a member one level down.
    ///
    /// Parent and reference are inherited unchanged.
    #[must_use]
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let segment = segment.into();
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(segment.clone());
        Self {
            key: Some(segment),
            path,
            parent: self.parent,
            reference: self.reference,
        }
    }

    /// Value sibling references resolve against.
    #[must_use]
    pub fn reference_root(&self) -> Option<&'a Value> {
        self.reference.or(self.parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_extends_path() {
        let parent = Value::from(vec![1, 2]);
        let root = State::root().child("list").with_parent(&parent);
        let element = root.child(3);

        assert_eq!(
            element.path,
            vec![PathSegment::from("list"), PathSegment::Index(3)]
        );
        assert_eq!(element.key, Some(PathSegment::Index(3)));
        assert!(element.parent.is_some());
    }

    #[test]
    fn reference_overrides_parent() {
        let parent = Value::from(1);
        let reference = Value::from(2);
        let state = State::root().with_parent(&parent);
        assert_eq!(state.reference_root(), Some(&parent));

        let state = state.with_reference(&reference);
        assert_eq!(state.reference_root(), Some(&reference));
    }
}

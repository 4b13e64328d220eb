//! Error types
//!
//! Two families live here:
//!
//! - [`ValidationError`] / [`ValidationErrors`]: data did not match a schema.
//!   These are ordinary values collected during a validation call.
//! - [`SchemaError`]: a schema could not be built (malformed builder argument,
//!   unreadable description). These halt composition immediately.
//!
//! All static strings use `Cow<'static, str>` so the common case allocates
//! nothing beyond the parameter values.

use crate::foundation::state::{PathSegment, State};
use crate::foundation::value::Value;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;

// ============================================================================
// ERROR CODE
// ============================================================================

/// Identifies the rule a value violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    AnyRequired,
    AnyUnknown,
    AnyInvalid,
    AnyAllowOnly,
    AnyCustom,
    BooleanBase,
    NumberBase,
    NumberMin,
    NumberMax,
    NumberInteger,
    StringBase,
    StringMin,
    StringMax,
    ArrayBase,
    ArraySparse,
    ArrayExcludes,
    ArrayExcludesSingle,
    ArrayOrdered,
    ArrayOrderedLength,
    ArrayIncludes,
    ArrayIncludesSingle,
    ArrayIncludesOne,
    ArrayIncludesOneSingle,
    ArrayIncludesRequiredKnowns,
    ArrayIncludesRequiredUnknowns,
    ArrayIncludesRequiredBoth,
    ArrayUnique,
    ArrayMin,
    ArrayMax,
    ArrayLength,
    ArrayRef,
}

impl ErrorCode {
    /// Stable dotted identifier, e.g. `"array.sparse"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AnyRequired => "any.required",
            Self::AnyUnknown => "any.unknown",
            Self::AnyInvalid => "any.invalid",
            Self::AnyAllowOnly => "any.allowOnly",
            Self::AnyCustom => "any.custom",
            Self::BooleanBase => "boolean.base",
            Self::NumberBase => "number.base",
            Self::NumberMin => "number.min",
            Self::NumberMax => "number.max",
            Self::NumberInteger => "number.integer",
            Self::StringBase => "string.base",
            Self::StringMin => "string.min",
            Self::StringMax => "string.max",
            Self::ArrayBase => "array.base",
            Self::ArraySparse => "array.sparse",
            Self::ArrayExcludes => "array.excludes",
            Self::ArrayExcludesSingle => "array.excludesSingle",
            Self::ArrayOrdered => "array.ordered",
            Self::ArrayOrderedLength => "array.orderedLength",
            Self::ArrayIncludes => "array.includes",
            Self::ArrayIncludesSingle => "array.includesSingle",
            Self::ArrayIncludesOne => "array.includesOne",
            Self::ArrayIncludesOneSingle => "array.includesOneSingle",
            Self::ArrayIncludesRequiredKnowns => "array.includesRequiredKnowns",
            Self::ArrayIncludesRequiredUnknowns => "array.includesRequiredUnknowns",
            Self::ArrayIncludesRequiredBoth => "array.includesRequiredBoth",
            Self::ArrayUnique => "array.unique",
            Self::ArrayMin => "array.min",
            Self::ArrayMax => "array.max",
            Self::ArrayLength => "array.length",
            Self::ArrayRef => "array.ref",
        }
    }

    /// Default English message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AnyRequired => "is required",
            Self::AnyUnknown => "is not allowed",
            Self::AnyInvalid => "contains an invalid value",
            Self::AnyAllowOnly => "must be one of the allowed values",
            Self::AnyCustom => "failed a custom check",
            Self::BooleanBase => "must be a boolean",
            Self::NumberBase => "must be a number",
            Self::NumberMin => "must be greater than or equal to the limit",
            Self::NumberMax => "must be less than or equal to the limit",
            Self::NumberInteger => "must be an integer",
            Self::StringBase => "must be a string",
            Self::StringMin => "length must be at least the limit",
            Self::StringMax => "length must be at most the limit",
            Self::ArrayBase => "must be an array",
            Self::ArraySparse => "must not be a sparse array",
            Self::ArrayExcludes | Self::ArrayExcludesSingle => "contains an excluded value",
            Self::ArrayOrdered => "does not match its positional schema",
            Self::ArrayOrderedLength => "has more items than positional schemas",
            Self::ArrayIncludes | Self::ArrayIncludesSingle => {
                "does not match any of the allowed types"
            }
            Self::ArrayIncludesOne | Self::ArrayIncludesOneSingle => {
                "does not match the item schema"
            }
            Self::ArrayIncludesRequiredKnowns => "does not contain the required items",
            Self::ArrayIncludesRequiredUnknowns => "does not contain enough required values",
            Self::ArrayIncludesRequiredBoth => {
                "does not contain the required items and enough required values"
            }
            Self::ArrayUnique => "contains a duplicate value",
            Self::ArrayMin => "must contain at least the limit of items",
            Self::ArrayMax => "must contain at most the limit of items",
            Self::ArrayLength => "must contain exactly the limit of items",
            Self::ArrayRef => "references a limit that is not a non-negative integer",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A single rule violation.
///
/// The `(code, params, path)` triple is the machine-readable part;
/// `message` is a default English rendering. Failures of nested schemas
/// (the reason an element was rejected) are kept in `nested`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Violated rule.
    pub code: ErrorCode,

    /// Human-readable message.
    pub message: Cow<'static, str>,

    /// Location from the document root.
    pub path: Vec<PathSegment>,

    /// Key of the validated member in its container, if any.
    pub key: Option<PathSegment>,

    /// Rule-specific context (`limit`, `pos`, `dupePos`, ...).
    ///
    /// Stored as ordered key-value pairs (typically 1-4 params).
    pub params: SmallVec<[(Cow<'static, str>, Value); 4]>,

    /// Failures of nested schemas that explain this error.
    pub nested: Vec<ValidationError>,
}

impl ValidationError {
    /// Creates an error with the code's default message and no location.
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: Cow::Borrowed(code.message()),
            path: Vec::new(),
            key: None,
            params: SmallVec::new(),
            nested: Vec::new(),
        }
    }

    /// Takes path and key from a validation state.
    #[must_use = "builder methods must be chained or built"]
    pub fn at(mut self, state: &State<'_>) -> Self {
        self.path = state.path.clone();
        self.key = state.key.clone();
        self
    }

    /// Overrides the key.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_key(mut self, key: Option<PathSegment>) -> Self {
        self.key = key;
        self
    }

    /// Overrides the message.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Adds a context parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Attaches the nested failures that explain this error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_nested(mut self, errors: ValidationErrors) -> Self {
        self.nested = errors.into_vec();
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v)
    }

    /// Dot-joined path, e.g. `"0.tags.2"`.
    #[must_use]
    pub fn path_string(&self) -> String {
        join_path(&self.path)
    }

    /// Returns the number of errors (including nested).
    #[must_use]
    pub fn total_error_count(&self) -> usize {
        1 + self
            .nested
            .iter()
            .map(ValidationError::total_error_count)
            .sum::<usize>()
    }
}

pub(crate) fn join_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.path.is_empty() {
            Cow::Borrowed("value")
        } else {
            Cow::Owned(join_path(&self.path))
        };
        write!(f, "[{label}] {}: {}", self.code, self.message)?;

        if !self.params.is_empty() {
            write!(f, " (params: [")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, "])")?;
        }

        if !self.nested.is_empty() {
            write!(f, "\n  Nested errors:")?;
            for (i, error) in self.nested.iter().enumerate() {
                write!(f, "\n    {}. {}", i + 1, error)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// ERROR COLLECTION
// ============================================================================

/// Ordered list of validation errors.
///
/// Order follows element traversal order and, within one element, the phase
/// that produced the error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Creates a new empty error collection.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Adds an error to the collection.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Appends all errors of another collection.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns all errors.
    #[must_use]
    pub fn as_slice(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Iterates over the errors in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Codes of all top-level errors, in order.
    #[must_use]
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(|e| e.code).collect()
    }

    /// Consumes the collection.
    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }

    /// `Ok(value)` when empty, `Err(self)` otherwise.
    pub fn into_result<T>(self, ok_value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(ok_value)
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl std::ops::Index<usize> for ValidationErrors {
    type Output = ValidationError;

    fn index(&self, index: usize) -> &Self::Output {
        &self.errors[index]
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// SCHEMA ERROR
// ============================================================================

/// A schema could not be constructed.
///
/// Raised eagerly by fallible builders and by description/shorthand
/// compilation, never during validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A builder argument at `position` was malformed.
    ///
    /// `position` is dot-joined for nested arguments (`"1.0"`).
    #[error("{source} ({position})")]
    InvalidArgument {
        position: String,
        #[source]
        source: Box<SchemaError>,
    },

    /// A limit was neither a non-negative integer nor a reference.
    #[error("limit must be a positive integer or reference, got {0}")]
    InvalidLimit(String),

    /// A reference descriptor could not be parsed.
    #[error("invalid reference `{0}`")]
    InvalidReference(String),

    /// A description or shorthand literal was malformed.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A description named a type this engine does not know.
    #[error("unknown schema type `{0}`")]
    UnknownType(String),

    /// A description mentioned a user function that cannot be rebuilt.
    #[error("{0} cannot be reconstructed from a description")]
    Opaque(String),
}

impl SchemaError {
    /// Records that this error came from the argument at `index`.
    ///
    /// Positions of already-positioned errors are prefixed, so nested
    /// failures read outermost-first.
    #[must_use]
    pub fn at(self, index: usize) -> Self {
        match self {
            Self::InvalidArgument { position, source } => Self::InvalidArgument {
                position: format!("{index}.{position}"),
                source,
            },
            other => Self::InvalidArgument {
                position: index.to_string(),
                source: Box::new(other),
            },
        }
    }
}

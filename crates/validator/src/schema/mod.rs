//! Schema kinds
//!
//! A [`Schema`] is an immutable, cheaply shareable description of acceptable
//! values. Each kind ([`AnySchema`], [`BooleanSchema`], [`NumberSchema`],
//! [`StringSchema`], [`ArraySchema`]) carries the attributes in [`Common`] and
//! plugs its own base check and rules into the shared flow in
//! [`validate_inner`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use tessera_validator::prelude::*;
//!
//! let tags = array()
//!     .items([string().min(1)])
//!     .max(10usize)
//!     .unique();
//!
//! let cleaned = tags.validate(vec!["a", "b"])?;
//! ```

mod any;
pub mod array;
mod boolean;
mod number;
mod string;

pub use any::AnySchema;
pub use array::{ArraySchema, UniqueBy, UniqueOptions};
pub use boolean::BooleanSchema;
pub use number::NumberSchema;
pub use string::StringSchema;

use crate::describe::Description;
use crate::foundation::{
    ErrorCode, State, Validate, ValidationError, ValidationErrors, ValidationOptions, Value,
    deep_equal,
};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

// ============================================================================
// COMMON ATTRIBUTES
// ============================================================================

/// Whether a value must, may or must not be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    #[default]
    Optional,
    Required,
    Forbidden,
}

type CustomFn = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;
type ExternalFn = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

/// A user-supplied check run after the kind's own rules.
#[derive(Clone)]
pub enum Check {
    /// Synchronous predicate.
    Custom { name: String, check: CustomFn },
    /// Asynchronous predicate; the validation call suspends until it resolves.
    External { name: String, check: ExternalFn },
}

impl Check {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Custom { name, .. } | Self::External { name, .. } => name,
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom { name, .. } => f.debug_tuple("Custom").field(name).finish(),
            Self::External { name, .. } => f.debug_tuple("External").field(name).finish(),
        }
    }
}

/// Attributes every schema kind carries.
#[derive(Debug, Clone, Default)]
pub struct Common {
    pub presence: Presence,
    /// Remove the value from its container after it matches.
    pub strip: bool,
    pub label: Option<String>,
    pub valids: Vec<Value>,
    pub invalids: Vec<Value>,
    /// Only values in `valids` are accepted.
    pub allow_only: bool,
    pub checks: Vec<Check>,
}

impl Common {
    fn is_valid(&self, value: &Value) -> bool {
        self.valids.iter().any(|v| deep_equal(v, value))
    }

    fn is_invalid(&self, value: &Value) -> bool {
        self.invalids.iter().any(|v| deep_equal(v, value))
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder methods shared by every kind.
///
/// Each method consumes the schema and returns the modified copy; built
/// schemas are never mutated.
pub trait SchemaBuilder: Sized {
    #[doc(hidden)]
    fn common_mut(&mut self) -> &mut Common;

    #[must_use = "builder methods must be chained or built"]
    fn presence(mut self, presence: Presence) -> Self {
        self.common_mut().presence = presence;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    fn required(self) -> Self {
        self.presence(Presence::Required)
    }

    #[must_use = "builder methods must be chained or built"]
    fn optional(self) -> Self {
        self.presence(Presence::Optional)
    }

    #[must_use = "builder methods must be chained or built"]
    fn forbidden(self) -> Self {
        self.presence(Presence::Forbidden)
    }

    /// Removes matching values from the enclosing array.
    #[must_use = "builder methods must be chained or built"]
    fn strip(mut self) -> Self {
        self.common_mut().strip = true;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    fn label(mut self, label: impl Into<String>) -> Self {
        self.common_mut().label = Some(label.into());
        self
    }

    /// Accepts `values` unconditionally.
    #[must_use = "builder methods must be chained or built"]
    fn allow<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let common = self.common_mut();
        for value in values {
            let value = value.into();
            common.invalids.retain(|v| !deep_equal(v, &value));
            if !common.is_valid(&value) {
                common.valids.push(value);
            }
        }
        self
    }

    /// Accepts only `values`.
    #[must_use = "builder methods must be chained or built"]
    fn valid<I, T>(self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let mut schema = self.allow(values);
        schema.common_mut().allow_only = true;
        schema
    }

    /// Rejects `values` with `any.invalid`.
    #[must_use = "builder methods must be chained or built"]
    fn invalid<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let common = self.common_mut();
        for value in values {
            let value = value.into();
            common.valids.retain(|v| !deep_equal(v, &value));
            if !common.is_invalid(&value) {
                common.invalids.push(value);
            }
        }
        self
    }

    /// Adds a synchronous check. An `Err(message)` becomes `any.custom`.
    #[must_use = "builder methods must be chained or built"]
    fn custom<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.common_mut().checks.push(Check::Custom {
            name: name.into(),
            check: Arc::new(check),
        });
        self
    }

    /// Adds an asynchronous check, e.g. a lookup against another service.
    #[must_use = "builder methods must be chained or built"]
    fn external<F, Fut>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        let check: ExternalFn = Arc::new(move |value| Box::pin(check(value)));
        self.common_mut().checks.push(Check::External {
            name: name.into(),
            check,
        });
        self
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Any schema kind.
#[derive(Debug, Clone)]
pub enum Schema {
    Any(AnySchema),
    Boolean(BooleanSchema),
    Number(NumberSchema),
    String(StringSchema),
    Array(ArraySchema),
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Schema::Any($inner) => $body,
            Schema::Boolean($inner) => $body,
            Schema::Number($inner) => $body,
            Schema::String($inner) => $body,
            Schema::Array($inner) => $body,
        }
    };
}

impl Validate for Schema {
    fn common(&self) -> &Common {
        dispatch!(self, inner => inner.common())
    }

    fn base<'a>(
        &'a self,
        value: Value,
        state: &'a State<'a>,
        options: &'a ValidationOptions,
    ) -> BoxFuture<'a, Result<Value, ValidationErrors>> {
        dispatch!(self, inner => inner.base(value, state, options))
    }

    fn check_rules(
        &self,
        value: &Value,
        state: &State<'_>,
        options: &ValidationOptions,
    ) -> ValidationErrors {
        dispatch!(self, inner => inner.check_rules(value, state, options))
    }

    fn describe(&self) -> Description {
        dispatch!(self, inner => inner.describe())
    }
}

impl SchemaBuilder for Schema {
    fn common_mut(&mut self) -> &mut Common {
        dispatch!(self, inner => inner.common_mut())
    }
}

impl Schema {
    /// Returns the array schema, if this is one.
    #[must_use]
    pub fn as_array(&self) -> Option<&ArraySchema> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl From<AnySchema> for Schema {
    fn from(schema: AnySchema) -> Self {
        Self::Any(schema)
    }
}

impl From<BooleanSchema> for Schema {
    fn from(schema: BooleanSchema) -> Self {
        Self::Boolean(schema)
    }
}

impl From<NumberSchema> for Schema {
    fn from(schema: NumberSchema) -> Self {
        Self::Number(schema)
    }
}

impl From<StringSchema> for Schema {
    fn from(schema: StringSchema) -> Self {
        Self::String(schema)
    }
}

impl From<ArraySchema> for Schema {
    fn from(schema: ArraySchema) -> Self {
        Self::Array(schema)
    }
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

/// Accepts any value.
#[must_use]
pub fn any() -> AnySchema {
    AnySchema::default()
}

/// Accepts booleans.
#[must_use]
pub fn boolean() -> BooleanSchema {
    BooleanSchema::default()
}

/// Accepts finite numbers.
#[must_use]
pub fn number() -> NumberSchema {
    NumberSchema::default()
}

/// Accepts text.
#[must_use]
pub fn string() -> StringSchema {
    StringSchema::default()
}

/// Accepts arrays.
#[must_use]
pub fn array() -> ArraySchema {
    ArraySchema::default()
}

// ============================================================================
// SHARED FLOW
// ============================================================================

/// Validates `value` against `node`.
///
/// Order: presence, allow list, deny list, allow-only, base check, rules,
/// user checks. Base errors end the flow; other failures end it only under
/// `abort_early`.
pub(crate) fn validate_inner<'a, V>(
    node: &'a V,
    value: Value,
    state: &'a State<'a>,
    options: &'a ValidationOptions,
) -> BoxFuture<'a, Result<Value, ValidationErrors>>
where
    V: Validate + ?Sized,
{
    Box::pin(async move {
        let common = node.common();

        match common.presence {
            Presence::Forbidden if value.is_undefined() => return Ok(value),
            Presence::Forbidden => {
                return Err(ValidationError::new(ErrorCode::AnyUnknown).at(state).into());
            }
            Presence::Required if value.is_undefined() => {
                return Err(ValidationError::new(ErrorCode::AnyRequired).at(state).into());
            }
            Presence::Optional if value.is_undefined() => return Ok(value),
            _ => {}
        }

        if common.is_valid(&value) {
            return Ok(value);
        }

        let mut errors = ValidationErrors::new();

        if common.is_invalid(&value) {
            errors.push(
                ValidationError::new(ErrorCode::AnyInvalid)
                    .at(state)
                    .with_param("value", value.clone()),
            );
            if options.abort_early {
                return Err(errors);
            }
        }

        if common.allow_only {
            errors.push(
                ValidationError::new(ErrorCode::AnyAllowOnly)
                    .at(state)
                    .with_param("valids", common.valids.clone()),
            );
            return Err(errors);
        }

        let value = match node.base(value, state, options).await {
            Ok(value) => value,
            Err(base_errors) => {
                errors.extend(base_errors);
                return Err(errors);
            }
        };

        let rule_errors = node.check_rules(&value, state, options);
        if !rule_errors.is_empty() {
            errors.extend(rule_errors);
            if options.abort_early {
                return Err(errors);
            }
        }

        for check in &common.checks {
            let outcome = match check {
                Check::Custom { check, .. } => check(&value),
                Check::External { check, .. } => check(value.clone()).await,
            };
            if let Err(message) = outcome {
                errors.push(
                    ValidationError::new(ErrorCode::AnyCustom)
                        .at(state)
                        .with_param("name", check.name())
                        .with_message(message),
                );
                if options.abort_early {
                    return Err(errors);
                }
            }
        }

        errors.into_result(value)
    })
}

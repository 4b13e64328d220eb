//! Core traits for the validation system
//!
//! Every schema kind implements [`Validate`], which exposes the pieces the
//! shared validation flow needs: common attributes, the kind's base check and
//! its rules. [`ValidateExt`] adds the user-facing entry points on top.

use crate::describe::Description;
use crate::foundation::error::{ValidationErrors, join_path};
use crate::foundation::options::ValidationOptions;
use crate::foundation::state::State;
use crate::foundation::value::Value;
use crate::schema::{Common, validate_inner};
use futures::future::BoxFuture;
use tracing::debug;

// ============================================================================
// CORE VALIDATOR TRAIT
// ============================================================================

/// A schema kind.
///
/// Implementors are immutable once built and shared across threads, so the
/// trait requires `Send + Sync`.
pub trait Validate: Send + Sync {
    /// Attributes shared by all kinds.
    fn common(&self) -> &Common;

    /// Type check and coercion.
    ///
    /// Runs after presence and allow/deny handling. An error here stops the
    /// flow before any rule runs. The future resolves to the coerced value.
    fn base<'a>(
        &'a self,
        value: Value,
        state: &'a State<'a>,
        options: &'a ValidationOptions,
    ) -> BoxFuture<'a, Result<Value, ValidationErrors>> {
        let _ = (state, options);
        Box::pin(async move { Ok(value) })
    }

    /// Kind-specific rules, evaluated in declaration order on the coerced
    /// value.
    ///
    /// Implementations stop at the first failure when
    /// [`ValidationOptions::abort_early`] is set.
    fn check_rules(
        &self,
        value: &Value,
        state: &State<'_>,
        options: &ValidationOptions,
    ) -> ValidationErrors {
        let _ = (value, state, options);
        ValidationErrors::new()
    }

    /// Serializable description of this schema.
    fn describe(&self) -> Description;
}

// ============================================================================
// EXTENSION TRAIT
// ============================================================================

/// Entry points for validating a value.
///
/// Blanket-implemented for every [`Validate`] type.
///
/// # Examples
///
/// ```rust,ignore
/// use tessera_validator::prelude::*;
///
/// let schema = array().items([number()]).unique();
/// assert!(schema.validate(vec![1, 2, 3]).is_ok());
/// assert!(schema.validate(vec![1, 1]).is_err());
/// ```
pub trait ValidateExt: Validate {
    /// Validates with default options.
    fn validate(&self, value: impl Into<Value>) -> Result<Value, ValidationErrors> {
        self.validate_with(value, &ValidationOptions::default())
    }

    /// Validates on the current thread.
    ///
    /// External checks that suspend are driven to completion in place.
    fn validate_with(
        &self,
        value: impl Into<Value>,
        options: &ValidationOptions,
    ) -> Result<Value, ValidationErrors> {
        futures::executor::block_on(self.validate_async(value, options))
    }

    /// Validates as a `Send` future, for use inside an async runtime.
    fn validate_async<'a>(
        &'a self,
        value: impl Into<Value>,
        options: &'a ValidationOptions,
    ) -> BoxFuture<'a, Result<Value, ValidationErrors>> {
        let value = value.into();
        Box::pin(async move {
            let state = State::root();
            self.validate_in(value, &state, options).await
        })
    }

    /// Validates with a caller-supplied state.
    ///
    /// Use this when sibling references must resolve against a known parent.
    fn validate_in<'a>(
        &'a self,
        value: Value,
        state: &'a State<'a>,
        options: &'a ValidationOptions,
    ) -> BoxFuture<'a, Result<Value, ValidationErrors>> {
        Box::pin(async move {
            let result = validate_inner(self, value, state, options).await;
            debug!(
                path = %join_path(&state.path),
                valid = result.is_ok(),
                errors = result.as_ref().err().map_or(0, ValidationErrors::len),
                "validation finished"
            );
            result
        })
    }
}

impl<T: Validate + ?Sized> ValidateExt for T {}

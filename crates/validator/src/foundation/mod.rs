//! Core validation types and traits
//!
//! This module contains the building blocks every schema kind relies on:
//!
//! - **Values**: [`Value`], the dynamic tree under validation
//! - **Traits**: [`Validate`], [`ValidateExt`]
//! - **Errors**: [`ValidationError`], [`ValidationErrors`], [`SchemaError`]
//! - **State & options**: [`State`], [`ValidationOptions`]
//! - **References**: [`Reference`], [`Limit`]

pub mod error;
pub mod options;
pub mod reference;
pub mod state;
pub mod traits;
pub mod value;

pub use error::{ErrorCode, SchemaError, ValidationError, ValidationErrors};
pub use options::{StripUnknown, ValidationOptions};
pub use reference::{Limit, RefScope, Reference};
pub use state::{PathSegment, State};
pub use traits::{Validate, ValidateExt};
pub use value::{Map, Value, deep_equal};

// ============================================================================
// TYPE ALIASES
// ============================================================================

/// Outcome of a validation call: the coerced value or every collected error.
pub type ValidationResult = Result<Value, ValidationErrors>;

//! Prelude module for convenient imports.
//!
//! Provides a single `use tessera_validator::prelude::*;` import that brings
//! in the schema constructors, builder traits, values and errors.
//!
//! # Examples
//!
//! ```rust,ignore
//! use tessera_validator::prelude::*;
//!
//! let pair = array().ordered([number(), number()]);
//! let tags = array().items([string().min(1)]).unique();
//! ```

// ============================================================================
// FOUNDATION: Core traits, values, errors
// ============================================================================

pub use crate::foundation::{
    ErrorCode, Limit, PathSegment, Reference, SchemaError, State, StripUnknown, Validate,
    ValidateExt, ValidationError, ValidationErrors, ValidationOptions, ValidationResult, Value,
};

// ============================================================================
// SCHEMAS: Kinds, builders and constructors
// ============================================================================

pub use crate::schema::{
    AnySchema, ArraySchema, BooleanSchema, NumberSchema, Presence, Schema, SchemaBuilder,
    StringSchema, UniqueBy, UniqueOptions, any, array, boolean, number, string,
};

// ============================================================================
// DESCRIPTIONS
// ============================================================================

pub use crate::cast::compile;
pub use crate::describe::Description;

//! # tessera-validator
//!
//! A runtime schema-validation engine for dynamic (JSON-shaped) values.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tessera_validator::prelude::*;
//!
//! let schema = array()
//!     .items([number().integer()])
//!     .min(1usize)
//!     .unique();
//!
//! assert_eq!(schema.validate("[1, 2]")?, Value::from(vec![1, 2]));
//! assert!(schema.validate(vec![1, 1]).is_err());
//! ```
//!
//! ## Layout
//!
//! - [`foundation`]: values, errors, options, references and the core traits
//! - [`iterate`]: the cursor-driven loop behind every element pass
//! - [`schema`]: schema kinds and their builders
//! - [`describe`]: serializable descriptions and reconstruction
//! - [`cast`]: JSON shorthands for schemas
//!
//! ## Logging
//!
//! The crate emits `tracing` events (`debug` per top-level validation,
//! `trace` for element removal and fail-fast aborts) and never installs a
//! subscriber.

// ValidationError is returned by value throughout; boxing it would add an
// allocation to every failed check.
#![allow(clippy::result_large_err)]

pub mod cast;
pub mod describe;
pub mod foundation;
pub mod iterate;
pub mod prelude;
pub mod schema;

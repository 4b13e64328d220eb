//! JSON shorthands for schemas.
//!
//! - an object with a `"type"` member is read as a [`Description`];
//! - a scalar literal (`null`, boolean, number, text) becomes
//!   `any().valid([literal])`;
//! - anything else is rejected.

use crate::describe::{Description, SchemaKind};
use crate::foundation::{SchemaError, Value};
use crate::schema::{Schema, SchemaBuilder, any};

/// Compiles a JSON shorthand into a schema.
///
/// # Errors
///
/// [`SchemaError::UnknownType`] for an unrecognized `"type"`;
/// [`SchemaError::InvalidSchema`] for arrays, objects without `"type"` and
/// malformed descriptions; any error of [`Schema::from_description`].
pub fn compile(literal: &serde_json::Value) -> Result<Schema, SchemaError> {
    match literal {
        serde_json::Value::Object(map) if map.contains_key("type") => {
            if let Some(kind) = map.get("type").and_then(serde_json::Value::as_str) {
                kind.parse::<SchemaKind>()?;
            }
            let description: Description = serde_json::from_value(literal.clone())
                .map_err(|error| SchemaError::InvalidSchema(error.to_string()))?;
            Schema::from_description(&description)
        }
        serde_json::Value::Null
        | serde_json::Value::Bool(_)
        | serde_json::Value::Number(_)
        | serde_json::Value::String(_) => Ok(any().valid([Value::from(literal.clone())]).into()),
        other => Err(SchemaError::InvalidSchema(format!(
            "cannot build a schema from {other}"
        ))),
    }
}

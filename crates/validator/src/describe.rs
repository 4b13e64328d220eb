//! Schema descriptions
//!
//! [`Description`] is a plain serde tree that captures everything needed to
//! rebuild a schema: its kind, flags, allow/deny lists, rules and (for arrays)
//! nested item descriptions. It round-trips through JSON:
//!
//! ```rust,ignore
//! let description = array().items([number().min(0.0)]).describe();
//! let json = serde_json::to_value(&description)?;
//! let rebuilt = Schema::from_description(&serde_json::from_value(json)?)?;
//! ```
//!
//! User functions (custom checks, external checks, custom uniqueness
//! comparators) are described by name only and cannot be rebuilt.

use crate::foundation::{Limit, SchemaError, Value};
use crate::schema::{
    ArraySchema, Common, Presence, Schema, SchemaBuilder, UniqueBy, UniqueOptions, any, array,
    boolean, number, string,
};
use serde::{Deserialize, Serialize};

/// Schema kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Any,
    Boolean,
    Number,
    String,
    Array,
}

impl std::str::FromStr for SchemaKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "boolean" => Ok(Self::Boolean),
            "number" => Ok(Self::Number),
            "string" => Ok(Self::String),
            "array" => Ok(Self::Array),
            other => Err(SchemaError::UnknownType(other.to_owned())),
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

/// Flags; defaults are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Flags {
    #[serde(skip_serializing_if = "is_optional")]
    pub presence: Presence,
    #[serde(skip_serializing_if = "is_false")]
    pub strip: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub allow_only: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub sparse: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub single: bool,
}

fn is_optional(presence: &Presence) -> bool {
    *presence == Presence::Optional
}

impl Flags {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// One rule and its argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescription {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<serde_json::Value>,
}

impl RuleDescription {
    #[must_use]
    pub fn new(name: impl Into<String>, arg: Option<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            arg,
        }
    }

    fn unsupported(&self, kind: SchemaKind) -> SchemaError {
        SchemaError::InvalidSchema(format!("unknown rule `{}` for {kind:?}", self.name))
    }

    fn limit(&self) -> Result<Limit, SchemaError> {
        self.arg
            .as_ref()
            .ok_or_else(|| SchemaError::InvalidLimit("missing".into()))
            .and_then(Limit::try_from)
    }

    fn number(&self) -> Result<f64, SchemaError> {
        self.arg
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| SchemaError::InvalidSchema(format!("rule `{}` needs a number", self.name)))
    }

    fn count(&self) -> Result<usize, SchemaError> {
        match self.limit()? {
            Limit::Value(n) => Ok(n),
            Limit::Ref(reference) => Err(SchemaError::InvalidLimit(reference.descriptor())),
        }
    }
}

/// Serializable description of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    #[serde(rename = "type")]
    pub kind: SchemaKind,
    #[serde(default, skip_serializing_if = "Flags::is_default")]
    pub flags: Flags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valids: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalids: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleDescription>,
    /// Names of custom and external checks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered_items: Option<Vec<Description>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Description>>,
}

impl Description {
    pub(crate) fn new(kind: SchemaKind, common: &Common) -> Self {
        Self {
            kind,
            flags: Flags {
                presence: common.presence,
                strip: common.strip,
                allow_only: common.allow_only,
                sparse: false,
                single: false,
            },
            label: common.label.clone(),
            valids: common.valids.iter().map(Value::to_json).collect(),
            invalids: common.invalids.iter().map(Value::to_json).collect(),
            rules: Vec::new(),
            checks: common.checks.iter().map(|check| check.name().to_owned()).collect(),
            ordered_items: None,
            items: None,
        }
    }

    #[must_use]
    pub(crate) fn with_rule(mut self, name: &str, arg: Option<serde_json::Value>) -> Self {
        self.rules.push(RuleDescription::new(name, arg));
        self
    }
}

// ============================================================================
// RECONSTRUCTION
// ============================================================================

impl Schema {
    /// Rebuilds a schema from its description.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::Opaque`] if the description names a user function
    /// - [`SchemaError::InvalidSchema`] / [`SchemaError::InvalidLimit`] for
    ///   malformed rules
    /// - [`SchemaError::InvalidArgument`] wrapping any of the above for a
    ///   nested item, with its position
    pub fn from_description(description: &Description) -> Result<Self, SchemaError> {
        if let Some(name) = description.checks.first() {
            return Err(SchemaError::Opaque(format!("check `{name}`")));
        }

        let schema: Self = match description.kind {
            SchemaKind::Any => {
                reject_rules(description)?;
                any().into()
            }
            SchemaKind::Boolean => {
                reject_rules(description)?;
                boolean().into()
            }
            SchemaKind::Number => {
                let mut schema = number();
                for rule in &description.rules {
                    schema = match rule.name.as_str() {
                        "min" => schema.min(rule.number()?),
                        "max" => schema.max(rule.number()?),
                        "integer" => schema.integer(),
                        _ => return Err(rule.unsupported(description.kind)),
                    };
                }
                schema.into()
            }
            SchemaKind::String => {
                let mut schema = string();
                for rule in &description.rules {
                    schema = match rule.name.as_str() {
                        "min" => schema.min(rule.count()?),
                        "max" => schema.max(rule.count()?),
                        _ => return Err(rule.unsupported(description.kind)),
                    };
                }
                schema.into()
            }
            SchemaKind::Array => array_from_description(description)?.into(),
        };

        Ok(apply_common(schema, description))
    }
}

fn reject_rules(description: &Description) -> Result<(), SchemaError> {
    description
        .rules
        .first()
        .map_or(Ok(()), |rule| Err(rule.unsupported(description.kind)))
}

fn rebuild_all(descriptions: &[Description]) -> Result<Vec<Schema>, SchemaError> {
    descriptions
        .iter()
        .enumerate()
        .map(|(position, item)| Schema::from_description(item).map_err(|error| error.at(position)))
        .collect()
}

fn array_from_description(description: &Description) -> Result<ArraySchema, SchemaError> {
    let mut schema = array()
        .sparse(description.flags.sparse)
        .single(description.flags.single);

    if let Some(ordereds) = &description.ordered_items {
        schema = schema.ordered(rebuild_all(ordereds)?);
    }
    if let Some(items) = &description.items {
        schema = schema.items(rebuild_all(items)?);
    }

    for rule in &description.rules {
        schema = match rule.name.as_str() {
            "min" => schema.min(rule.limit()?),
            "max" => schema.max(rule.limit()?),
            "length" => schema.length(rule.limit()?),
            "unique" => {
                let arg = rule.arg.clone().unwrap_or_default();
                if arg.get("comparator").is_some() {
                    return Err(SchemaError::Opaque("unique comparator".into()));
                }
                let options: UniqueOptions = if arg.is_null() {
                    UniqueOptions::default()
                } else {
                    serde_json::from_value(arg.clone())
                        .map_err(|error| SchemaError::InvalidSchema(error.to_string()))?
                };
                let by = match arg.get("path").and_then(serde_json::Value::as_str) {
                    Some(path) => UniqueBy::Path(path.to_owned()),
                    None => UniqueBy::Deep,
                };
                schema.unique_with_options(by, options)
            }
            _ => return Err(rule.unsupported(description.kind)),
        };
    }
    Ok(schema)
}

fn apply_common(schema: Schema, description: &Description) -> Schema {
    let mut schema = schema
        .presence(description.flags.presence)
        .allow(description.valids.iter().cloned().map(Value::from))
        .invalid(description.invalids.iter().cloned().map(Value::from));
    if description.flags.strip {
        schema = schema.strip();
    }
    if description.flags.allow_only {
        schema.common_mut().allow_only = true;
    }
    if let Some(label) = &description.label {
        schema = schema.label(label.clone());
    }
    schema
}

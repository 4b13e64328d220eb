//! Collection validator
//!
//! [`ArraySchema`] checks each element against positional (`ordered`) and
//! general (`items`) schemas, coerces text and scalars into arrays, and applies
//! size and uniqueness rules to the result.
//!
//! General item schemas are split by presence when added:
//!
//! - `required` items must each be matched by some element (once);
//! - `forbidden` items become exclusions: any element they accept is an error;
//! - everything else is an inclusion: every element must match one of them.
//!
//! # Examples
//!
//! ```rust,ignore
//! use tessera_validator::prelude::*;
//!
//! let point = array().ordered([number(), number()]).length(2usize);
//! assert!(point.validate(vec![1, 2]).is_ok());
//!
//! let ids = array().items([number().integer()]).unique().single(true);
//! assert_eq!(ids.validate(5)?, Value::from(vec![5]));
//! ```

mod items;
mod rules;
mod unique;

pub use unique::{UniqueBy, UniqueOptions};

use crate::cast;
use crate::describe::{Description, SchemaKind};
use crate::foundation::{
    ErrorCode, Limit, SchemaError, State, Validate, ValidationError, ValidationErrors,
    ValidationOptions, Value,
};
use crate::schema::{Common, Presence, Schema, SchemaBuilder};
use futures::future::BoxFuture;
use rules::ArrayRule;
use std::sync::Arc;
use tracing::trace;
use unique::UniqueRule;

/// Schema for arrays.
#[derive(Debug, Clone, Default)]
pub struct ArraySchema {
    common: Common,
    /// General item schemas as declared.
    items: Vec<Arc<Schema>>,
    ordereds: Vec<Arc<Schema>>,
    inclusions: Vec<Arc<Schema>>,
    /// Forbidden items, stored with presence reset to optional.
    exclusions: Vec<Arc<Schema>>,
    requireds: Vec<Arc<Schema>>,
    sparse: bool,
    single: bool,
    rules: Vec<ArrayRule>,
}

impl ArraySchema {
    // ========================================================================
    // ITEMS
    // ========================================================================

    /// Adds general item schemas.
    #[must_use = "builder methods must be chained or built"]
    pub fn items<I>(mut self, schemas: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Schema>,
    {
        for schema in schemas {
            let schema = Arc::new(schema.into());
            match schema.common().presence {
                Presence::Required => self.requireds.push(Arc::clone(&schema)),
                Presence::Forbidden => {
                    let exclusion = (*schema).clone().optional();
                    self.exclusions.push(Arc::new(exclusion));
                }
                Presence::Optional => self.inclusions.push(Arc::clone(&schema)),
            }
            self.items.push(schema);
        }
        self
    }

    /// Adds general item schemas written as JSON shorthands.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed shorthand, naming its position.
    pub fn items_from<'j, I>(self, literals: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = &'j serde_json::Value>,
    {
        Ok(self.items(compile_all(literals)?))
    }

    /// Adds positional schemas; the n-th element is checked against the n-th
    /// schema.
    #[must_use = "builder methods must be chained or built"]
    pub fn ordered<I>(mut self, schemas: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Schema>,
    {
        self.ordereds
            .extend(schemas.into_iter().map(|schema| Arc::new(schema.into())));
        self
    }

    /// Adds positional schemas written as JSON shorthands.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed shorthand, naming its position.
    pub fn ordered_from<'j, I>(self, literals: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = &'j serde_json::Value>,
    {
        Ok(self.ordered(compile_all(literals)?))
    }

    // ========================================================================
    // RULES
    // ========================================================================

    #[must_use = "builder methods must be chained or built"]
    pub fn min(mut self, limit: impl Into<Limit>) -> Self {
        self.rules.push(ArrayRule::Min(limit.into()));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn max(mut self, limit: impl Into<Limit>) -> Self {
        self.rules.push(ArrayRule::Max(limit.into()));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn length(mut self, limit: impl Into<Limit>) -> Self {
        self.rules.push(ArrayRule::Length(limit.into()));
        self
    }

    /// Rejects deep-equal duplicates.
    #[must_use = "builder methods must be chained or built"]
    pub fn unique(self) -> Self {
        self.unique_with_options(UniqueBy::Deep, UniqueOptions::default())
    }

    /// Rejects elements whose member at `path` duplicates an earlier one.
    #[must_use = "builder methods must be chained or built"]
    pub fn unique_by(self, path: impl Into<String>) -> Self {
        self.unique_with_options(UniqueBy::Path(path.into()), UniqueOptions::default())
    }

    /// Rejects elements the comparator reports equal to an earlier one.
    #[must_use = "builder methods must be chained or built"]
    pub fn unique_with<F>(self, comparator: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.unique_with_options(UniqueBy::Custom(Arc::new(comparator)), UniqueOptions::default())
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn unique_with_options(mut self, by: UniqueBy, options: UniqueOptions) -> Self {
        self.rules.push(ArrayRule::Unique(UniqueRule::new(by, options)));
        self
    }

    // ========================================================================
    // FLAGS
    // ========================================================================

    /// Allows undefined elements.
    #[must_use = "builder methods must be chained or built"]
    pub fn sparse(mut self, enabled: bool) -> Self {
        self.sparse = enabled;
        self
    }

    /// With `convert`, wraps a non-array value into a one-element array.
    #[must_use = "builder methods must be chained or built"]
    pub fn single(mut self, enabled: bool) -> Self {
        self.single = enabled;
        self
    }

    #[must_use]
    pub fn is_sparse(&self) -> bool {
        self.sparse
    }

    #[must_use]
    pub fn is_single(&self) -> bool {
        self.single
    }

    /// Nothing to check per element.
    fn accepts_any_element(&self) -> bool {
        self.inclusions.is_empty()
            && self.exclusions.is_empty()
            && self.requireds.is_empty()
            && self.ordereds.is_empty()
            && self.sparse
    }
}

fn compile_all<'j, I>(literals: I) -> Result<Vec<Schema>, SchemaError>
where
    I: IntoIterator<Item = &'j serde_json::Value>,
{
    literals
        .into_iter()
        .enumerate()
        .map(|(position, literal)| cast::compile(literal).map_err(|error| error.at(position)))
        .collect()
}

/// Text that parses as a JSON array.
fn parse_array(text: &str) -> Option<Value> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(parsed @ serde_json::Value::Array(_)) => Some(parsed.into()),
        _ => None,
    }
}

impl Validate for ArraySchema {
    fn common(&self) -> &Common {
        &self.common
    }

    fn base<'a>(
        &'a self,
        value: Value,
        state: &'a State<'a>,
        options: &'a ValidationOptions,
    ) -> BoxFuture<'a, Result<Value, ValidationErrors>> {
        Box::pin(async move {
            let mut value = value;

            if options.convert
                && let Some(parsed) = value.as_str().and_then(parse_array)
            {
                value = parsed;
            }

            let was_array = value.is_array();
            if options.convert && self.single && !was_array {
                value = Value::Array(vec![value]);
            }

            let items = match value {
                Value::Array(items) => items,
                other => {
                    return Err(ValidationError::new(ErrorCode::ArrayBase)
                        .at(state)
                        .with_param("value", other)
                        .into());
                }
            };

            if self.accepts_any_element() {
                return Ok(Value::Array(items));
            }

            let retry = (was_array && options.convert && self.single).then(|| items.clone());

            match items::check_items(self, items, !was_array, state, options).await {
                Ok(items) => Ok(Value::Array(items)),
                Err(errors) => {
                    let Some(original) = retry else {
                        return Err(errors);
                    };
                    trace!(errors = errors.len(), "retrying array as a single element");
                    let wrapped = vec![Value::Array(original)];
                    items::check_items(self, wrapped, false, state, options)
                        .await
                        .map(Value::Array)
                        .map_err(|_| errors)
                }
            }
        })
    }

    fn check_rules(
        &self,
        value: &Value,
        state: &State<'_>,
        options: &ValidationOptions,
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let Some(items) = value.as_array() else {
            return errors;
        };

        for rule in &self.rules {
            if let Err(error) = rule.check(items, state, options) {
                errors.push(error);
                if options.abort_early {
                    break;
                }
            }
        }
        errors
    }

    fn describe(&self) -> Description {
        let mut description = Description::new(SchemaKind::Array, &self.common);
        description.flags.sparse = self.sparse;
        description.flags.single = self.single;
        description.rules = self.rules.iter().map(ArrayRule::describe).collect();

        if !self.ordereds.is_empty() {
            description.ordered_items =
                Some(self.ordereds.iter().map(|schema| schema.describe()).collect());
        }
        if !self.items.is_empty() {
            description.items = Some(self.items.iter().map(|schema| schema.describe()).collect());
        }
        description
    }
}

impl SchemaBuilder for ArraySchema {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}

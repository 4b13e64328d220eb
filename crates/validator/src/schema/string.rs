use crate::describe::{Description, SchemaKind};
use crate::foundation::{
    ErrorCode, State, Validate, ValidationError, ValidationErrors, ValidationOptions, Value,
};
use crate::schema::{Common, SchemaBuilder};
use futures::future::BoxFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringRule {
    Min(usize),
    Max(usize),
}

/// Accepts text. Length rules count characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    common: Common,
    rules: Vec<StringRule>,
}

impl StringSchema {
    #[must_use = "builder methods must be chained or built"]
    pub fn min(mut self, limit: usize) -> Self {
        self.rules.push(StringRule::Min(limit));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn max(mut self, limit: usize) -> Self {
        self.rules.push(StringRule::Max(limit));
        self
    }
}

impl Validate for StringSchema {
    fn common(&self) -> &Common {
        &self.common
    }

    fn base<'a>(
        &'a self,
        value: Value,
        state: &'a State<'a>,
        _options: &'a ValidationOptions,
    ) -> BoxFuture<'a, Result<Value, ValidationErrors>> {
        let result = if value.as_str().is_some() {
            Ok(value)
        } else {
            Err(ValidationError::new(ErrorCode::StringBase)
                .at(state)
                .with_param("value", value)
                .into())
        };
        Box::pin(async move { result })
    }

    fn check_rules(
        &self,
        value: &Value,
        state: &State<'_>,
        options: &ValidationOptions,
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let Some(text) = value.as_str() else {
            return errors;
        };
        let length = text.chars().count();

        for rule in &self.rules {
            let error = match *rule {
                StringRule::Min(limit) if length < limit => {
                    ValidationError::new(ErrorCode::StringMin).with_param("limit", limit)
                }
                StringRule::Max(limit) if length > limit => {
                    ValidationError::new(ErrorCode::StringMax).with_param("limit", limit)
                }
                _ => continue,
            };
            errors.push(error.at(state).with_param("value", text));
            if options.abort_early {
                break;
            }
        }
        errors
    }

    fn describe(&self) -> Description {
        self.rules.iter().fold(
            Description::new(SchemaKind::String, &self.common),
            |description, rule| match *rule {
                StringRule::Min(limit) => description.with_rule("min", Some(limit.into())),
                StringRule::Max(limit) => description.with_rule("max", Some(limit.into())),
            },
        )
    }
}

impl SchemaBuilder for StringSchema {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ValidateExt;
    use crate::schema::string;

    #[test]
    fn counts_characters() {
        let schema = string().max(2);
        assert!(schema.validate("żó").is_ok());
        assert_eq!(
            schema.validate("abc").unwrap_err().codes(),
            vec![ErrorCode::StringMax]
        );
    }

    #[test]
    fn rejects_non_text() {
        assert_eq!(
            string().validate(1).unwrap_err().codes(),
            vec![ErrorCode::StringBase]
        );
    }
}

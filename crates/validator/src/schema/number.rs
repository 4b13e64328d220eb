use crate::describe::{Description, SchemaKind};
use crate::foundation::{
    ErrorCode, State, Validate, ValidationError, ValidationErrors, ValidationOptions, Value,
};
use crate::schema::{Common, SchemaBuilder};
use futures::future::BoxFuture;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NumberRule {
    Min(f64),
    Max(f64),
    Integer,
}

/// Accepts finite numbers. With `convert`, also numeric text.
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    common: Common,
    rules: Vec<NumberRule>,
}

impl NumberSchema {
    /// Rejects numbers below `limit`.
    #[must_use = "builder methods must be chained or built"]
    pub fn min(mut self, limit: f64) -> Self {
        self.rules.push(NumberRule::Min(limit));
        self
    }

    /// Rejects numbers above `limit`.
    #[must_use = "builder methods must be chained or built"]
    pub fn max(mut self, limit: f64) -> Self {
        self.rules.push(NumberRule::Max(limit));
        self
    }

    /// Rejects numbers with a fractional part.
    #[must_use = "builder methods must be chained or built"]
    pub fn integer(mut self) -> Self {
        self.rules.push(NumberRule::Integer);
        self
    }
}

fn coerce(value: Value, convert: bool) -> Result<Value, Value> {
    let parsed = match (&value, convert) {
        (Value::Number(n), _) => Some(*n),
        (Value::String(text), true) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() => Ok(Value::Number(n)),
        _ => Err(value),
    }
}

impl NumberRule {
    fn check(self, n: f64) -> Option<ValidationError> {
        match self {
            Self::Min(limit) if n < limit => {
                Some(ValidationError::new(ErrorCode::NumberMin).with_param("limit", limit))
            }
            Self::Max(limit) if n > limit => {
                Some(ValidationError::new(ErrorCode::NumberMax).with_param("limit", limit))
            }
            Self::Integer if n.fract() != 0.0 => Some(ValidationError::new(ErrorCode::NumberInteger)),
            _ => None,
        }
    }
}

impl Validate for NumberSchema {
    fn common(&self) -> &Common {
        &self.common
    }

    fn base<'a>(
        &'a self,
        value: Value,
        state: &'a State<'a>,
        options: &'a ValidationOptions,
    ) -> BoxFuture<'a, Result<Value, ValidationErrors>> {
        let result = coerce(value, options.convert).map_err(|value| {
            ValidationError::new(ErrorCode::NumberBase)
                .at(state)
                .with_param("value", value)
                .into()
        });
        Box::pin(async move { result })
    }

    fn check_rules(
        &self,
        value: &Value,
        state: &State<'_>,
        options: &ValidationOptions,
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let Some(n) = value.as_f64() else {
            return errors;
        };
        for rule in &self.rules {
            if let Some(error) = rule.check(n) {
                errors.push(error.at(state).with_param("value", n));
                if options.abort_early {
                    break;
                }
            }
        }
        errors
    }

    fn describe(&self) -> Description {
        self.rules.iter().fold(
            Description::new(SchemaKind::Number, &self.common),
            |description, rule| match rule {
                NumberRule::Min(limit) => description.with_rule("min", Some((*limit).into())),
                NumberRule::Max(limit) => description.with_rule("max", Some((*limit).into())),
                NumberRule::Integer => description.with_rule("integer", None),
            },
        )
    }
}

impl SchemaBuilder for NumberSchema {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}

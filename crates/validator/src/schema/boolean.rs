use crate::describe::{Description, SchemaKind};
use crate::foundation::{
    ErrorCode, State, Validate, ValidationError, ValidationErrors, ValidationOptions, Value,
};
use crate::schema::{Common, SchemaBuilder};
use futures::future::BoxFuture;

/// Accepts booleans. With `convert`, also `"true"` / `"false"` in any case.
#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    common: Common,
}

fn coerce(value: Value, convert: bool) -> Result<Value, Value> {
    if matches!(value, Value::Bool(_)) {
        return Ok(value);
    }

    let parsed = match (&value, convert) {
        (Value::String(text), true) => {
            let text = text.trim();
            if text.eq_ignore_ascii_case("true") {
                Some(true)
            } else if text.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    };
    parsed.map(Value::Bool).ok_or(value)
}

impl Validate for BooleanSchema {
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
            ValidationError::new(ErrorCode::BooleanBase)
                .at(state)
                .with_param("value", value)
                .into()
        });
        Box::pin(async move { result })
    }

    fn describe(&self) -> Description {
        Description::new(SchemaKind::Boolean, &self.common)
    }
}

impl SchemaBuilder for BooleanSchema {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}

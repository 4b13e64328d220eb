use super::unique::UniqueRule;
use crate::describe::RuleDescription;
use crate::foundation::{ErrorCode, Limit, State, ValidationError, ValidationOptions, Value};

/// Rules evaluated on the coerced array, in declaration order.
#[derive(Debug, Clone)]
pub(crate) enum ArrayRule {
    Min(Limit),
    Max(Limit),
    Length(Limit),
    Unique(UniqueRule),
}

impl ArrayRule {
    pub(crate) fn check(
        &self,
        items: &[Value],
        state: &State<'_>,
        options: &ValidationOptions,
    ) -> Result<(), ValidationError> {
        let (limit, code) = match self {
            Self::Min(limit) => (limit, ErrorCode::ArrayMin),
            Self::Max(limit) => (limit, ErrorCode::ArrayMax),
            Self::Length(limit) => (limit, ErrorCode::ArrayLength),
            Self::Unique(rule) => return rule.check(items, state),
        };

        let Some(n) = limit.resolve(state, options) else {
            let reference = match limit {
                Limit::Ref(reference) => reference.descriptor(),
                Limit::Value(n) => n.to_string(),
            };
            return Err(ValidationError::new(ErrorCode::ArrayRef)
                .at(state)
                .with_param("ref", reference));
        };

        let len = items.len();
        let holds = match self {
            Self::Min(_) => len >= n,
            Self::Max(_) => len <= n,
            _ => len == n,
        };
        if holds {
            Ok(())
        } else {
            Err(ValidationError::new(code)
                .at(state)
                .with_param("limit", n)
                .with_param("value", items.to_vec()))
        }
    }

    pub(crate) fn describe(&self) -> RuleDescription {
        match self {
            Self::Min(limit) => RuleDescription::new("min", Some(limit.describe())),
            Self::Max(limit) => RuleDescription::new("max", Some(limit.describe())),
            Self::Length(limit) => RuleDescription::new("length", Some(limit.describe())),
            Self::Unique(rule) => RuleDescription::new("unique", Some(rule.describe())),
        }
    }
}

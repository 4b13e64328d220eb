//! Per-element pass of the array validator.
//!
//! Each element goes through a fixed series of phases (sparse, exclusions,
//! ordered, required, inclusions, fallback) driven by
//! [`run_in_series`](crate::iterate::run_in_series). A phase returning
//! `Break(Stop::Element)` settles the element and the loop moves on; a phase
//! returning `Break(Stop::Abort)` ends the whole pass. Phases that remove the
//! element from the working copy step the cursor back so the next element,
//! which now sits at the same index, is not skipped.

use super::ArraySchema;
use crate::foundation::{
    ErrorCode, State, Validate, ValidationError, ValidationErrors, ValidationOptions, Value,
};
use crate::iterate::{Cursor, Task, run_in_series};
use crate::schema::{Presence, Schema, validate_inner};
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::trace;

/// Why a phase stopped the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    /// The current element is settled.
    Element,
    /// Fail-fast: give up on the whole array.
    Abort,
}

type Phase<'s> = Task<ItemsPass<'s>, Stop>;

struct ItemsPass<'s> {
    schema: &'s ArraySchema,
    state: &'s State<'s>,
    options: &'s ValidationOptions,
    /// The input was a scalar wrapped by `single`.
    wrapped: bool,
    strip_unknown: bool,
    items: Vec<Value>,
    cursor: Cursor,
    errors: ValidationErrors,
    ordereds: VecDeque<&'s Schema>,
    /// Required schemas not yet matched by any element.
    requireds: Vec<&'s Schema>,

    index: usize,
    local: State<'s>,
    /// Failures of the pending required schemas for the current element,
    /// aligned with `requireds`.
    required_failures: Vec<ValidationErrors>,
}

impl<'s> ItemsPass<'s> {
    fn new(
        schema: &'s ArraySchema,
        items: Vec<Value>,
        wrapped: bool,
        state: &'s State<'s>,
        options: &'s ValidationOptions,
    ) -> Self {
        Self {
            schema,
            state,
            options,
            wrapped,
            strip_unknown: options.strip_unknown.arrays,
            items,
            cursor: Cursor::new(),
            errors: ValidationErrors::new(),
            ordereds: schema.ordereds.iter().map(Arc::as_ref).collect(),
            requireds: schema.requireds.iter().map(Arc::as_ref).collect(),
            index: 0,
            local: state.clone(),
            required_failures: Vec::new(),
        }
    }

    fn enter(&mut self, index: usize) {
        self.index = index;
        self.local = if self.wrapped {
            self.state.clone()
        } else {
            self.state.child(index)
        };
        self.required_failures.clear();
    }

    fn item(&self) -> &Value {
        &self.items[self.index]
    }

    /// Error located at the current element, keyed like the array.
    fn error(&self, code: ErrorCode) -> ValidationError {
        ValidationError::new(code)
            .at(&self.local)
            .with_key(self.state.key.clone())
            .with_param("pos", self.index)
    }

    fn code(&self, array: ErrorCode, single: ErrorCode) -> ErrorCode {
        if self.wrapped { single } else { array }
    }

    /// Records `error` and settles the element, or aborts under fail-fast.
    fn fail(&mut self, error: ValidationError) -> ControlFlow<Stop> {
        self.errors.push(error);
        if self.options.abort_early {
            ControlFlow::Break(Stop::Abort)
        } else {
            ControlFlow::Break(Stop::Element)
        }
    }

    fn remove_current(&mut self) -> ControlFlow<Stop> {
        self.items.remove(self.index);
        self.cursor.step_back();
        trace!(pos = self.index, remaining = self.items.len(), "array element removed");
        ControlFlow::Break(Stop::Element)
    }

    /// Stores an accepted value, flagging undefined results of a dense array.
    fn store(&mut self, value: Value) -> ControlFlow<Stop> {
        if value.is_undefined() && !self.schema.sparse {
            let error = self.error(ErrorCode::ArraySparse);
            return self.fail(error);
        }
        self.items[self.index] = value;
        ControlFlow::Break(Stop::Element)
    }

    /// Summary of required schemas no element matched.
    fn missing_required(&self) -> Option<ValidationError> {
        let missing = self.requireds.iter().copied().chain(
            self.ordereds
                .iter()
                .copied()
                .filter(|schema| schema.common().presence == Presence::Required),
        );

        let mut known = Vec::new();
        let mut unknown = 0usize;
        for schema in missing {
            match &schema.common().label {
                Some(label) => known.push(Value::from(label.as_str())),
                None => unknown += 1,
            }
        }

        let error = match (known.is_empty(), unknown) {
            (true, 0) => return None,
            (true, _) => ValidationError::new(ErrorCode::ArrayIncludesRequiredUnknowns)
                .with_param("unknownMisses", unknown),
            (false, 0) => ValidationError::new(ErrorCode::ArrayIncludesRequiredKnowns)
                .with_param("knownMisses", known),
            (false, _) => ValidationError::new(ErrorCode::ArrayIncludesRequiredBoth)
                .with_param("knownMisses", known)
                .with_param("unknownMisses", unknown),
        };
        Some(error.at(self.state))
    }
}

/// Checks every element of `items`, returning the coerced copy.
pub(super) async fn check_items<'s>(
    schema: &'s ArraySchema,
    items: Vec<Value>,
    wrapped: bool,
    state: &'s State<'s>,
    options: &'s ValidationOptions,
) -> Result<Vec<Value>, ValidationErrors> {
    let phases: [Phase<'s>; 6] = [
        |pass| sparse(pass),
        |pass| exclusions(pass),
        |pass| ordered(pass),
        |pass| required(pass),
        |pass| inclusions(pass),
        |pass| fallback(pass),
    ];
    let mut pass = ItemsPass::new(schema, items, wrapped, state, options);

    while let Some(index) = pass.cursor.advance(pass.items.len()) {
        pass.enter(index);
        if run_in_series(&mut pass, &phases).await == ControlFlow::Break(Stop::Abort) {
            trace!(pos = index, "array validation aborted");
            return Err(pass.errors);
        }
    }

    if let Some(error) = pass.missing_required() {
        pass.errors.push(error);
    }
    pass.errors.into_result(pass.items)
}

// ============================================================================
// PHASES
// ============================================================================

fn sparse<'a>(pass: &'a mut ItemsPass<'_>) -> BoxFuture<'a, ControlFlow<Stop>> {
    Box::pin(async move {
        if pass.schema.sparse || !pass.item().is_undefined() {
            return ControlFlow::Continue(());
        }
        pass.ordereds.pop_front();
        let error = pass.error(ErrorCode::ArraySparse);
        pass.fail(error)
    })
}

fn exclusions<'a>(pass: &'a mut ItemsPass<'_>) -> BoxFuture<'a, ControlFlow<Stop>> {
    Box::pin(async move {
        let schema = pass.schema;
        if schema.exclusions.is_empty() {
            return ControlFlow::Continue(());
        }

        let bare = ValidationOptions::bare();
        for exclusion in &schema.exclusions {
            let exclusion: &Schema = exclusion;
            let item = pass.item().clone();
            if validate_inner(exclusion, item, &pass.local, &bare)
                .await
                .is_ok()
            {
                pass.ordereds.pop_front();
                let code = pass.code(ErrorCode::ArrayExcludes, ErrorCode::ArrayExcludesSingle);
                let error = pass.error(code).with_param("value", pass.item().clone());
                return pass.fail(error);
            }
        }
        ControlFlow::Continue(())
    })
}

fn ordered<'a>(pass: &'a mut ItemsPass<'_>) -> BoxFuture<'a, ControlFlow<Stop>> {
    Box::pin(async move {
        let schema = pass.schema;
        if schema.ordereds.is_empty() {
            return ControlFlow::Continue(());
        }

        let Some(positional) = pass.ordereds.pop_front() else {
            if schema.items.is_empty() {
                let error = pass
                    .error(ErrorCode::ArrayOrderedLength)
                    .with_param("limit", schema.ordereds.len());
                return pass.fail(error);
            }
            return ControlFlow::Continue(());
        };

        let item = pass.item().clone();
        match validate_inner(positional, item.clone(), &pass.local, pass.options).await {
            Ok(_) if positional.common().strip => pass.remove_current(),
            Ok(value) => pass.store(value),
            Err(reason) => {
                let error = pass
                    .error(ErrorCode::ArrayOrdered)
                    .with_param("value", item)
                    .with_nested(reason);
                pass.fail(error)
            }
        }
    })
}

fn required<'a>(pass: &'a mut ItemsPass<'_>) -> BoxFuture<'a, ControlFlow<Stop>> {
    Box::pin(async move {
        let pending = pass.requireds.clone();
        for (position, candidate) in pending.into_iter().enumerate() {
            let item = pass.item().clone();
            match validate_inner(candidate, item, &pass.local, pass.options).await {
                Ok(value) => {
                    pass.requireds.remove(position);
                    pass.required_failures.clear();
                    return pass.store(value);
                }
                Err(reason) => pass.required_failures.push(reason),
            }
        }
        ControlFlow::Continue(())
    })
}

fn inclusions<'a>(pass: &'a mut ItemsPass<'_>) -> BoxFuture<'a, ControlFlow<Stop>> {
    Box::pin(async move {
        let schema = pass.schema;
        let mut last_failure = None;

        for inclusion in &schema.inclusions {
            let inclusion: &Schema = inclusion;
            let item = pass.item().clone();
            match validate_inner(inclusion, item, &pass.local, pass.options).await {
                Ok(_) if inclusion.common().strip => return pass.remove_current(),
                Ok(value) => return pass.store(value),
                Err(reason) => last_failure = Some(reason),
            }
        }

        // Pending required schemas already failed in the previous phase.
        if let Some(reason) = pass.required_failures.pop() {
            last_failure = Some(reason);
        }

        if schema.inclusions.len() + pass.requireds.len() != 1 {
            return ControlFlow::Continue(());
        }
        if pass.strip_unknown {
            return pass.remove_current();
        }

        let code = pass.code(ErrorCode::ArrayIncludesOne, ErrorCode::ArrayIncludesOneSingle);
        let error = pass
            .error(code)
            .with_param("value", pass.item().clone())
            .with_nested(last_failure.unwrap_or_default());
        pass.fail(error)
    })
}

fn fallback<'a>(pass: &'a mut ItemsPass<'_>) -> BoxFuture<'a, ControlFlow<Stop>> {
    Box::pin(async move {
        let schema = pass.schema;
        if schema.inclusions.is_empty() && schema.requireds.is_empty() {
            return ControlFlow::Continue(());
        }
        if pass.strip_unknown {
            return pass.remove_current();
        }

        let code = pass.code(ErrorCode::ArrayIncludes, ErrorCode::ArrayIncludesSingle);
        let error = pass.error(code).with_param("value", pass.item().clone());
        pass.fail(error)
    })
}

//! End-to-end tests of the array validator through the public API.

use pretty_assertions::assert_eq;
use rstest::rstest;
use tessera_validator::prelude::*;

fn collect_all() -> ValidationOptions {
    ValidationOptions::default().with_abort_early(false)
}

fn values(items: Vec<Value>) -> Value {
    Value::from(items)
}

// ============================================================================
// ELEMENT PHASES
// ============================================================================

#[rstest]
#[case::empty(vec![], None)]
#[case::all_numbers(vec![Value::from(1), Value::from(2)], None)]
#[case::mixed_types(vec![Value::from(1), Value::from("a")], None)]
#[case::unmatched(vec![Value::from(true)], Some(ErrorCode::ArrayIncludes))]
#[case::excluded(vec![Value::from(1), Value::Null], Some(ErrorCode::ArrayExcludes))]
fn mixed_item_schemas(#[case] input: Vec<Value>, #[case] expected: Option<ErrorCode>) {
    let schema = array().items([
        Schema::from(number()),
        string().into(),
        any().valid([Value::Null]).forbidden().into(),
    ]);

    let result = schema.validate(values(input));
    match expected {
        None => assert!(result.is_ok(), "unexpected errors: {result:?}"),
        Some(code) => assert_eq!(result.unwrap_err().codes(), vec![code]),
    }
}

#[rstest]
#[case::excluded_head(
    array().ordered([Schema::from(number()), string().into()]).items([boolean().forbidden()]),
    vec![Value::from(true), Value::from("x")],
    ErrorCode::ArrayExcludes
)]
#[case::sparse_head(
    array().ordered([Schema::from(number()), string().into()]),
    vec![Value::Undefined, Value::from("x")],
    ErrorCode::ArraySparse
)]
fn rejected_element_consumes_its_positional_schema(
    #[case] schema: ArraySchema,
    #[case] input: Vec<Value>,
    #[case] expected: ErrorCode,
) {
    let errors = schema.validate_with(values(input), &collect_all()).unwrap_err();
    assert_eq!(errors.codes(), vec![expected]);
    assert_eq!(errors[0].path_string(), "0");
}

#[test]
fn ordered_then_items_for_the_tail() {
    let schema = array()
        .ordered([Schema::from(string()), number().into()])
        .items([boolean()]);

    assert_eq!(
        schema.validate(values(vec![
            Value::from("id"),
            Value::from("7"),
            Value::from("true"),
            Value::from(false),
        ])),
        Ok(values(vec![
            Value::from("id"),
            Value::from(7),
            Value::from(true),
            Value::from(false),
        ]))
    );

    let errors = schema
        .validate(values(vec![Value::from("id"), Value::from(7), Value::from(3)]))
        .unwrap_err();
    assert_eq!(errors.codes(), vec![ErrorCode::ArrayIncludesOne]);
    assert_eq!(errors[0].path_string(), "2");
}

#[test]
fn nested_arrays_report_full_paths() {
    let schema = array().items([array().items([number()])]);
    let errors = schema
        .validate(values(vec![values(vec![Value::from(1), Value::from("x")])]))
        .unwrap_err();

    assert_eq!(errors.codes(), vec![ErrorCode::ArrayIncludesOne]);
    assert_eq!(errors[0].path_string(), "0");

    let inner = &errors[0].nested[0];
    assert_eq!(inner.code, ErrorCode::ArrayIncludesOne);
    assert_eq!(inner.path_string(), "0.1");
    assert_eq!(inner.nested[0].code, ErrorCode::NumberBase);
}

#[test]
fn collect_all_reports_every_element() {
    let schema = array().items([number()]);
    let errors = schema
        .validate_with(
            values(vec![Value::from("a"), Value::from(1), Value::from("b")]),
            &collect_all(),
        )
        .unwrap_err();

    let paths: Vec<String> = errors.iter().map(ValidationError::path_string).collect();
    assert_eq!(paths, vec!["0", "2"]);
}

#[test]
fn strip_removes_matching_elements() {
    let schema = array().items([Schema::from(number()), any().valid(["drop"]).strip().into()]);
    assert_eq!(
        schema.validate(values(vec![
            Value::from("drop"),
            Value::from(1),
            Value::from("drop"),
            Value::from("drop"),
            Value::from(2),
        ])),
        Ok(Value::from(vec![1, 2]))
    );
}

#[test]
fn strip_unknown_arrays_only() {
    let schema = array().items([number()]);
    let input = values(vec![Value::from(1), Value::from("x")]);

    let arrays = ValidationOptions::default().with_strip_unknown(StripUnknown::arrays());
    assert_eq!(schema.validate_with(input.clone(), &arrays), Ok(Value::from(vec![1])));

    let objects = ValidationOptions::default().with_strip_unknown(StripUnknown {
        arrays: false,
        objects: true,
    });
    assert!(schema.validate_with(input, &objects).is_err());
}

// ============================================================================
// REQUIRED ITEMS
// ============================================================================

#[rstest]
#[case::both_present(vec![Value::from("a"), Value::from(1)], None)]
#[case::order_free(vec![Value::from(1), Value::from("a")], None)]
#[case::missing_label(vec![Value::from(1)], Some(ErrorCode::ArrayIncludesRequiredKnowns))]
#[case::missing_unlabeled(vec![Value::from("a")], Some(ErrorCode::ArrayIncludesRequiredUnknowns))]
#[case::missing_both(vec![], Some(ErrorCode::ArrayIncludesRequiredBoth))]
fn required_items(#[case] input: Vec<Value>, #[case] expected: Option<ErrorCode>) {
    let schema = array().items([
        Schema::from(string().required().label("name")),
        number().required().into(),
    ]);

    let result = schema.validate(values(input));
    match expected {
        None => assert!(result.is_ok(), "unexpected errors: {result:?}"),
        Some(code) => {
            let errors = result.unwrap_err();
            assert_eq!(errors.codes(), vec![code]);
            assert!(errors[0].path.is_empty());
        }
    }
}

// ============================================================================
// SINGLE AND CONVERSION
// ============================================================================

#[test]
fn single_and_string_input() {
    let schema = array().items([number()]).single(true);

    assert_eq!(schema.validate("[1, 2]"), Ok(Value::from(vec![1, 2])));
    assert_eq!(schema.validate(3), Ok(Value::from(vec![3])));

    let strict = ValidationOptions::default().with_convert(false);
    let errors = schema.validate_with(3, &strict).unwrap_err();
    assert_eq!(errors.codes(), vec![ErrorCode::ArrayBase]);
}

#[test]
fn single_excluded_scalar_uses_single_code() {
    let schema = array().items([number().forbidden()]).single(true);
    let errors = schema.validate(1).unwrap_err();
    assert_eq!(errors.codes(), vec![ErrorCode::ArrayExcludesSingle]);
}

// ============================================================================
// SIZE AND UNIQUENESS
// ============================================================================

#[test]
fn rules_run_on_the_coerced_array() {
    let schema = array().items([number()]).max(2usize).unique();

    let errors = schema.validate(vec!["1", "1"]).unwrap_err();
    assert_eq!(errors.codes(), vec![ErrorCode::ArrayUnique]);
    assert_eq!(errors[0].param("dupePos"), Some(&Value::from(0)));

    let errors = schema.validate(vec![1, 2, 3]).unwrap_err();
    assert_eq!(errors.codes(), vec![ErrorCode::ArrayMax]);
}

#[test]
fn element_errors_skip_rules() {
    let schema = array().items([number()]).min(3usize);
    let errors = schema
        .validate_with(vec!["x"], &collect_all())
        .unwrap_err();
    assert_eq!(errors.codes(), vec![ErrorCode::ArrayIncludesOne]);
}

#[test]
fn limits_resolve_from_context() {
    let schema = array().max(Reference::context("maxTags"));
    let mut context = tessera_validator::foundation::Map::new();
    context.insert("maxTags".to_owned(), Value::from(1));
    let options = ValidationOptions::default().with_context(context);

    assert!(schema.validate_with(vec![1], &options).is_ok());
    assert_eq!(
        schema.validate_with(vec![1, 2], &options).unwrap_err().codes(),
        vec![ErrorCode::ArrayMax]
    );
    assert_eq!(
        schema.validate(vec![1]).unwrap_err().codes(),
        vec![ErrorCode::ArrayRef]
    );
}

#[test]
fn unique_by_path_ignoring_undefined() {
    let mut first = tessera_validator::foundation::Map::new();
    first.insert("id".to_owned(), Value::from(1));
    let mut second = tessera_validator::foundation::Map::new();
    second.insert("id".to_owned(), Value::from(1));
    let empty = tessera_validator::foundation::Map::new();

    let schema = array().unique_with_options(
        UniqueBy::Path("id".to_owned()),
        UniqueOptions {
            ignore_undefined: true,
        },
    );

    let no_ids = values(vec![Value::from(empty.clone()), Value::from(empty)]);
    assert!(schema.validate(no_ids).is_ok());

    let errors = schema
        .validate(values(vec![Value::from(first), Value::from(second)]))
        .unwrap_err();
    assert_eq!(errors[0].code, ErrorCode::ArrayUnique);
    assert_eq!(errors[0].param("path"), Some(&Value::from("id")));
    assert_eq!(errors[0].path_string(), "1");
}

// ============================================================================
// SCALE
// ============================================================================

#[test]
fn large_arrays_validate_in_one_pass() {
    let input: Vec<i64> = (0..100_000).collect();
    let schema = array().items([number().integer()]).unique();
    let result = schema.validate(input.clone()).unwrap();
    assert_eq!(result.as_array().map(<[Value]>::len), Some(input.len()));
}

#[test]
fn large_arrays_strip_every_other_element() {
    let input: Vec<Value> = (0..50_000)
        .map(|i| if i % 2 == 0 { Value::from(i) } else { Value::from("x") })
        .collect();
    let options = ValidationOptions::default().with_strip_unknown(true);
    let result = array()
        .items([number()])
        .validate_with(values(input), &options)
        .unwrap();
    assert_eq!(result.as_array().map(<[Value]>::len), Some(25_000));
}

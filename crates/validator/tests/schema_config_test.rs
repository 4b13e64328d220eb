//! Schemas and options loaded from JSON configuration.

use pretty_assertions::assert_eq;
use serde_json::json;
use tessera_validator::describe::Description;
use tessera_validator::prelude::*;

// ============================================================================
// DESCRIPTIONS
// ============================================================================

#[test]
fn rebuilt_schema_behaves_like_the_original() {
    let original: Schema = array()
        .items([Schema::from(number().integer()), string().forbidden().into()])
        .ordered([string().min(1)])
        .min(2usize)
        .unique()
        .into();

    let text = serde_json::to_string(&original.describe()).unwrap();
    let description: Description = serde_json::from_str(&text).unwrap();
    let rebuilt = Schema::from_description(&description).unwrap();

    let inputs = [
        json!(["id", 1, 2]),
        json!(["id", 1, 1]),
        json!(["id", "x"]),
        json!(["", 1]),
        json!(["id"]),
        json!("[\"id\", 3]"),
    ];
    for input in inputs {
        let expected = original.validate(input.clone()).map_err(|e| e.codes());
        let actual = rebuilt.validate(input.clone()).map_err(|e| e.codes());
        assert_eq!(actual, expected, "input {input}");
    }
}

#[test]
fn compile_reads_typed_objects_and_literals() {
    let schema = compile(&json!({
        "type": "array",
        "flags": {"single": true},
        "rules": [{"name": "max", "arg": "context:limit"}],
        "items": [{"type": "string"}]
    }))
    .unwrap();

    assert!(schema.as_array().is_some_and(ArraySchema::is_single));

    let options = ValidationOptions::default().with_context(Value::from(json!({"limit": 2})));
    assert_eq!(
        schema.validate_with("one", &options),
        Ok(Value::from(vec!["one"]))
    );
    assert_eq!(
        schema
            .validate_with(vec!["a", "b", "c"], &options)
            .unwrap_err()
            .codes(),
        vec![ErrorCode::ArrayMax]
    );
}

#[test]
fn items_from_literals() {
    let literals = [json!("a"), json!(1), json!({"type": "boolean"})];
    let schema = array().items_from(&literals).unwrap();

    assert!(schema.validate(json!(["a", 1, true, "a"])).is_ok());
    assert_eq!(
        schema.validate(json!(["b"])).unwrap_err().codes(),
        vec![ErrorCode::ArrayIncludes]
    );
}

#[test]
fn ordered_from_reports_bad_position() {
    let literals = [json!(1), json!({"type": "set"})];
    let error = array().ordered_from(&literals).unwrap_err();
    assert_eq!(error.to_string(), "unknown schema type `set` (1)");
}

// ============================================================================
// OPTIONS
// ============================================================================

#[test]
fn options_from_partial_json() {
    let options: ValidationOptions =
        serde_json::from_value(json!({"abortEarly": false, "stripUnknown": true})).unwrap();

    assert!(!options.abort_early);
    assert!(options.convert);
    assert_eq!(options.strip_unknown, StripUnknown::arrays());
    assert!(options.context.is_undefined());
}

#[test]
fn options_strip_unknown_selector() {
    let options: ValidationOptions =
        serde_json::from_value(json!({"stripUnknown": {"objects": true}})).unwrap();
    assert!(!options.strip_unknown.arrays);
    assert!(options.strip_unknown.objects);
}

#[test]
fn options_drive_validation() {
    let options: ValidationOptions = serde_json::from_value(json!({
        "abortEarly": false,
        "convert": false,
        "context": {"max": 1}
    }))
    .unwrap();

    let schema = array().items([number()]).max("$max");
    let errors = schema
        .validate_with(json!(["1", "2"]), &options)
        .unwrap_err();
    assert_eq!(
        errors.codes(),
        vec![ErrorCode::ArrayIncludesOne, ErrorCode::ArrayIncludesOne]
    );
}

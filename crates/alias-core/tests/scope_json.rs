use alias_core::{Alias, AliasError, ErrorInfo, Scope, Value};

#[test]
fn scope_round_trip_json() {
    let scope = Scope::new();
    scope.insert("ok", true);
    scope.insert("n", 4);
    scope.insert("a", 0.5);
    scope.insert("label", "romberg");
    scope.insert("row", vec![Value::None, Value::Float(1.25)]);

    let json = scope.to_json().expect("serialize");
    let restored = Scope::from_json(&json).expect("deserialize");

    assert_eq!(restored.snapshot(), scope.snapshot());
    assert!(!restored.same_as(&scope));
    assert_eq!(restored.names(), vec!["a", "label", "n", "ok", "row"]);
}

#[test]
fn nested_alias_serializes_as_text() {
    let scope = Scope::new();
    scope.insert("x", 1);
    let x = Alias::bind(&scope, "x").unwrap();
    scope.insert("p", x);

    let json = scope.to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["p"], "alias to `x`");
    assert_eq!(parsed["x"], 1);
}

#[test]
fn malformed_json_maps_to_serde_family() {
    let err = Scope::from_json("[1, 2]").unwrap_err();
    match err {
        AliasError::Serde(info) => assert_eq!(info.code, "deserialize-json"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn clones_share_storage() {
    let scope = Scope::new();
    let handle = scope.clone();
    handle.insert("x", 1);
    assert!(scope.contains("x"));
    assert!(scope.same_as(&handle));
    assert_eq!(scope.len(), 1);
    assert_eq!(scope.insert("x", 2), Some(Value::Int(1)));
    assert_eq!(handle.remove("x"), Some(Value::Int(2)));
    assert!(scope.is_empty());
}

#[test]
fn error_payload_formatting() {
    let info = ErrorInfo::new("index-out-of-range", "index (4) is out of range")
        .with_context("index", 4)
        .with_context("len", 3)
        .with_hint("decrement the alias");
    let err = AliasError::IndexOutOfRange(info.clone());
    assert_eq!(err.info(), &info);
    assert_eq!(
        err.to_string(),
        "index out of range: index (4) is out of range (code: index-out-of-range) \
         | context: [index=4, len=3] | hint: decrement the alias"
    );

    let json = serde_json::to_string(&err).unwrap();
    let decoded: AliasError = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, err);
}

#[test]
fn value_accessors() {
    assert_eq!(Value::Int(3).as_float(), Some(3.0));
    assert_eq!(Value::from("s").as_str(), Some("s"));
    assert_eq!(Value::from(Some(true)).as_bool(), Some(true));
    assert!(Value::from(None::<i64>).is_none());
    assert!(Value::from(vec![1, 2]).is_sequence());
    assert_eq!(Value::Float(1.0).as_int(), None);
    assert_eq!(Value::Alias(Alias::empty()).type_name(), "alias");
}

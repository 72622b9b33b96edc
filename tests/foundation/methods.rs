//! Integration tests for value methods
//!
//! Tests name resolution and the lenient conversion semantics.

use blueprint_foundation::methods::as_json;
use blueprint_foundation::{ErrorKind, Value, ValueMethod, value_map};

#[test]
fn names_resolve() {
    assert_eq!(ValueMethod::parse("to_i").unwrap(), ValueMethod::ToI);
    assert_eq!(ValueMethod::parse("strip").unwrap(), ValueMethod::Strip);
    assert_eq!(ValueMethod::ToS.to_string(), "to_s");
}

#[test]
fn unknown_name_is_an_argument_error() {
    let err = ValueMethod::parse("frobnicate").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Argument(ref m) if m.contains("frobnicate")));
}

#[test]
fn to_i_of_a_word_is_zero() {
    assert_eq!(
        ValueMethod::ToI.apply(&Value::from("custom_get_set")).unwrap(),
        Value::Int(0)
    );
    assert_eq!(ValueMethod::ToI.apply(&Value::from("10")).unwrap(), Value::Int(10));
}

#[test]
fn to_s_of_integer() {
    assert_eq!(ValueMethod::ToS.apply(&Value::Int(12)).unwrap(), Value::from("12"));
}

#[test]
fn string_methods() {
    assert_eq!(
        ValueMethod::Upcase.apply(&Value::from("abc")).unwrap(),
        Value::from("ABC")
    );
    assert_eq!(
        ValueMethod::Strip.apply(&Value::from("  pad  ")).unwrap(),
        Value::from("pad")
    );
}

#[test]
fn unsupported_receiver() {
    let err = ValueMethod::Downcase.apply(&Value::Nil).unwrap_err();
    assert_eq!(err.to_string(), "undefined method 'downcase' for NilClass");
}

#[test]
fn as_json_recurses_into_collections() {
    let data = Value::from(vec![Value::Map(value_map! { "a" => vec![1] })]);
    assert_eq!(as_json(&data).unwrap(), data);
}

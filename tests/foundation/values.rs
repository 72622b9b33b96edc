//! Integration tests for Value types
//!
//! Tests Value variants, classes, blankness, equality, and display.

use blueprint_foundation::{Class, Value, value_map};

// =============================================================================
// Classes
// =============================================================================

#[test]
fn value_classes() {
    assert_eq!(Value::Nil.class(), Class::Nil);
    assert_eq!(Value::Bool(true).class(), Class::Bool);
    assert_eq!(Value::Int(1).class(), Class::Integer);
    assert_eq!(Value::Float(1.5).class(), Class::Float);
    assert_eq!(Value::from("s").class(), Class::String);
    assert_eq!(Value::from(vec![1]).class(), Class::Array);
    assert_eq!(Value::Map(value_map! {}).class(), Class::Hash);
}

#[test]
fn numeric_and_object_contain_expected_values() {
    assert!(Class::Numeric.contains(&Value::Int(1)));
    assert!(Class::Numeric.contains(&Value::Float(1.0)));
    assert!(!Class::Numeric.contains(&Value::from("1")));
    assert!(Class::Object.contains(&Value::Nil));
    assert!(Class::Object.contains(&Value::from("anything")));
}

// =============================================================================
// Presence
// =============================================================================

#[test]
fn blank_values() {
    assert!(Value::Nil.is_blank());
    assert!(Value::Bool(false).is_blank());
    assert!(Value::from("").is_blank());
    assert!(Value::from(" \t\n").is_blank());
    assert!(Value::from(Vec::<Value>::new()).is_blank());
    assert!(Value::Map(value_map! {}).is_blank());
}

#[test]
fn present_values() {
    assert!(Value::Bool(true).is_present());
    assert!(Value::Int(0).is_present());
    assert!(Value::Float(0.0).is_present());
    assert!(Value::from("x").is_present());
    assert!(Value::from(vec![Value::Nil]).is_present());
}

// =============================================================================
// Conversions
// =============================================================================

#[test]
fn option_converts_to_nil_or_value() {
    assert_eq!(Value::from(None::<i64>), Value::Nil);
    assert_eq!(Value::from(Some("x")), Value::from("x"));
}

#[test]
fn accessors_are_class_specific() {
    let v = Value::Int(42);
    assert_eq!(v.as_int(), Some(42));
    assert_eq!(v.as_float(), None);
    assert_eq!(v.as_str(), None);
    assert!(v.as_record().is_none());
}

#[test]
fn floats_compare_by_bits() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    assert_ne!(Value::Int(1), Value::Float(1.0));
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn debug_quotes_strings() {
    let v = Value::Map(value_map! { "a" => 1, "b" => "two" });
    assert_eq!(format!("{v:?}"), r#"{a: 1, b: "two"}"#);
}

#[test]
fn display_renders_strings_raw_and_nil_empty() {
    assert_eq!(Value::from("raw").to_string(), "raw");
    assert_eq!(Value::Nil.to_string(), "");
    assert_eq!(Value::Float(2.0).to_string(), "2.0");
}

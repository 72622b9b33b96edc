//! Integration tests for construction and accessors
//!
//! Tests required and optional fields, setter pipelines, nested coercion,
//! visibility, and presence predicates.

use blueprint_foundation::{ErrorKind, Result, Type, Value, value_map};
use blueprint_structure::{AttributeScope, Declare, DefaultValue, Instance, Side, StructType};

// =============================================================================
// Required and Optional
// =============================================================================

#[test]
fn required_field_must_be_given() {
    let t = StructType::define("Req", |s| {
        s.attr("id")?;
        Ok(())
    })
    .unwrap();
    let err = t.construct(&value_map! {}).unwrap_err();
    assert_eq!(err.to_string(), "'id' must be defined");
}

#[test]
fn explicit_nil_satisfies_a_required_untyped_field() {
    let t = StructType::define("Req", |s| {
        s.attr("id")?;
        Ok(())
    })
    .unwrap();
    let i = t.construct(&value_map! { "id" => Value::Nil }).unwrap();
    assert_eq!(i.get("id").unwrap(), Value::Nil);
}

#[test]
fn nil_defaulted_typed_field_accepts_nil() {
    let t = StructType::define("Opt", |s| {
        s.attr_with("n?", Some(Type::integer()), DefaultValue::Absent, |_| Ok(()))?;
        Ok(())
    })
    .unwrap();
    let mut i = t.construct(&value_map! {}).unwrap();
    assert_eq!(i.get("n").unwrap(), Value::Nil);
    i.set("n", 4).unwrap();
    i.set("n", Value::Nil).unwrap();
    assert!(i.set("n", "four").is_err());
}

#[test]
fn non_nil_default_does_not_exempt_nil() {
    let t = StructType::define("Strict", |s| {
        s.attr_with("n", Some(Type::integer()), DefaultValue::literal(0), |_| Ok(()))?;
        Ok(())
    })
    .unwrap();
    let err = t.construct(&value_map! { "n" => Value::Nil }).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AttributeType { .. }));
}

#[test]
fn deferred_defaults_are_fresh_per_instance() {
    let t = StructType::define("Fresh", |s| {
        s.attr("list")?.default_with(|| Value::from(vec![true, false]));
        Ok(())
    })
    .unwrap();
    let a = t.construct(&value_map! {}).unwrap();
    let b = t.construct(&value_map! {}).unwrap();
    assert_eq!(a.get("list").unwrap(), Value::from(vec![true, false]));
    assert_eq!(a, b);
}

// =============================================================================
// Setter Pipeline
// =============================================================================

#[test]
fn set_transform_then_get_transform() {
    let t = StructType::define("GetSet", |s| {
        s.attr("code")?
            .get("to_i")?
            .set_with(|v| Value::from(v.to_string()));
        Ok(())
    })
    .unwrap();
    let mut i = t.construct(&value_map! { "code" => "custom" }).unwrap();
    assert_eq!(i.get("code").unwrap(), Value::Int(0));

    i.set("code", 12).unwrap();
    assert_eq!(i.stored("code").unwrap(), &Value::from("12"));
    assert_eq!(i.get("code").unwrap(), Value::Int(12));
}

#[test]
fn type_error_names_attribute() {
    let t = StructType::define("Typed", |s| {
        s.attr_with("typed", Some(Type::integer()), DefaultValue::Absent, |_| Ok(()))?;
        Ok(())
    })
    .unwrap();
    let err = t.construct(&value_map! { "typed" => "12" }).unwrap_err();
    assert!(err.to_string().contains("Type error on attribute 'typed'"));
}

// =============================================================================
// Nested Structures
// =============================================================================

fn with_nested() -> std::sync::Arc<StructType> {
    StructType::define("Outer", |s| {
        s.attr("inner?")?.structure_with(|inner| {
            inner.attrs(&["a", "b"], Type::any_of(["a", "b"].map(Value::from)), DefaultValue::literal("a"), |_| Ok(()))?;
            Ok(())
        })?;
        s.attr("items?")?.array_structure_with(|item| {
            item.attr_with("n", Some(Type::integer()), DefaultValue::Absent, |_| Ok(()))?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap()
}

#[test]
fn mapping_is_coerced_into_nested_instance() {
    let i = with_nested()
        .construct(&value_map! { "inner" => value_map! { "b" => "b" } })
        .unwrap();
    let inner = i.get("inner").unwrap();
    let inner = inner.as_record().unwrap().downcast_ref::<Instance>().unwrap();
    assert_eq!(inner.get("a").unwrap(), Value::from("a"));
    assert_eq!(inner.get("b").unwrap(), Value::from("b"));
}

#[test]
fn nested_errors_propagate() {
    let err = with_nested()
        .construct(&value_map! { "inner" => value_map! { "a" => "c" } })
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AttributeType { ref attribute, .. } if attribute == "a"));
}

#[test]
fn non_mapping_is_a_coercion_error() {
    let err = with_nested()
        .construct(&value_map! { "inner" => 5 })
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Coercion { ref attribute, .. } if attribute == "inner"));
}

#[test]
fn array_of_mappings_is_coerced_element_wise() {
    let t = with_nested();
    let i = t
        .construct(&value_map! {
            "items" => vec![value_map! { "n" => 1 }, value_map! { "n" => 2 }],
        })
        .unwrap();
    let items = i.get("items").unwrap();
    let items = items.as_vec().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.as_record().is_some()));

    let err = t.construct(&value_map! { "items" => value_map! {} }).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Coercion { .. }));
}

#[test]
fn existing_instances_pass_through() {
    let t = with_nested();
    let first = t
        .construct(&value_map! { "inner" => value_map! { "a" => "b" } })
        .unwrap();
    let inner = first.get("inner").unwrap();

    let second = t.construct(&value_map! { "inner" => inner.clone() }).unwrap();
    assert_eq!(second.get("inner").unwrap(), inner);
}

#[test]
fn malformed_element_leaves_array_unchanged() {
    let mut i = with_nested()
        .construct(&value_map! { "items" => vec![value_map! { "n" => 1 }] })
        .unwrap();
    let before = i.stored("items").unwrap().clone();

    let err = i
        .set(
            "items",
            vec![Value::from(value_map! { "n" => 2 }), Value::from(value_map! { "n" => "x" })],
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AttributeType { ref attribute, .. } if attribute == "n"));
    assert_eq!(i.stored("items").unwrap(), &before);

    let err = i
        .set("items", vec![Value::from(value_map! { "n" => 3 }), Value::Int(4)])
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Coercion { .. }));
    assert_eq!(i.stored("items").unwrap(), &before);
}

fn letter_pair(inner: &mut AttributeScope<'_>) -> Result<()> {
    inner.attrs(&["a", "b"], Some(Type::constant("a") | Type::constant("b")), DefaultValue::literal("a"), |_| Ok(()))?;
    Ok(())
}

fn holder(name: &str) -> std::sync::Arc<StructType> {
    StructType::define(name, |s| {
        s.attr("inner")?.structure_with(letter_pair)?;
        Ok(())
    })
    .unwrap()
}

#[test]
fn identical_nested_blocks_validate_identically() {
    let first = holder("First");
    let second = holder("Second");

    let nested_type = |t: &StructType, field: &str| {
        let nested = t.schema().get("inner").unwrap().nested().unwrap().resolve().unwrap();
        nested.schema().get(field).unwrap().ty().cloned()
    };
    for field in ["a", "b"] {
        assert_eq!(nested_type(&first, field), nested_type(&second, field));
    }

    let inputs = [
        value_map! { "inner" => value_map! {} },
        value_map! { "inner" => value_map! { "a" => "b", "b" => "a" } },
        value_map! { "inner" => value_map! { "a" => "c" } },
        value_map! { "inner" => value_map! { "b" => 1 } },
        value_map! { "inner" => "not a mapping" },
        value_map! {},
    ];
    for input in &inputs {
        match (first.construct(input), second.construct(input)) {
            (Ok(x), Ok(y)) => assert_eq!(x.as_json().unwrap(), y.as_json().unwrap()),
            (Err(x), Err(y)) => {
                assert_eq!(std::mem::discriminant(&x.kind), std::mem::discriminant(&y.kind));
            }
            (x, y) => panic!("outcomes differ for {input:?}: {:?} vs {:?}", x.is_ok(), y.is_ok()),
        }
    }
}

// =============================================================================
// Visibility and Presence
// =============================================================================

#[test]
fn private_sides_are_enforced() {
    let t = StructType::define("Vis", |s| {
        s.private(&[]).attr("both")?;
        s.private(&[Side::Get]).attr("get_only")?;
        s.private(&[Side::Set]).attr("set_only")?;
        Ok(())
    })
    .unwrap();
    let mut i = t
        .construct(&value_map! { "both" => 1, "get_only" => 2, "set_only" => 3 })
        .unwrap();

    assert!(i.get("both").is_err());
    assert!(i.set("both", 0).is_err());
    assert!(i.stored("both").is_err());
    assert!(i.is_present("both").is_err());

    i.set("get_only", 20).unwrap();
    assert!(i.get("get_only").is_err());
    assert!(i.stored("get_only").is_err());

    assert_eq!(i.get("set_only").unwrap(), Value::Int(3));
    let err = i.set("set_only", 30).unwrap_err();
    assert_eq!(
        err.to_string(),
        "private setter 'set_only' called for Vis"
    );
    assert_eq!(i.get("set_only").unwrap(), Value::Int(3));

    let json = i.as_json().unwrap();
    assert_eq!(json.get("both"), Some(&Value::Int(1)));
    assert_eq!(json.get("get_only"), Some(&Value::Int(20)));
    assert_eq!(json.get("set_only"), Some(&Value::Int(3)));
}

#[test]
fn presence_predicate() {
    let t = StructType::define("Presence", |s| {
        s.attr("title?")?;
        Ok(())
    })
    .unwrap();
    let mut i = t.construct(&value_map! {}).unwrap();
    assert!(!i.is_present("title").unwrap());
    i.set("title", "").unwrap();
    assert!(!i.is_present("title").unwrap());
    i.set("title", "Dr").unwrap();
    assert!(i.is_present("title").unwrap());
}

#[test]
fn aliases_read_and_write_the_same_slot() {
    let t = StructType::define("Alias", |s| {
        s.attr_with("typed", Some(Type::integer()), DefaultValue::Absent, |b| {
            b.alias(&["typed_str", "typed_string"])?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();
    let mut i = t.construct(&value_map! { "typed" => 12 }).unwrap();
    assert_eq!(i.get("typed_str").unwrap(), Value::Int(12));
    i.set("typed_str", 13).unwrap();
    assert_eq!(i.get("typed").unwrap(), Value::Int(13));
    assert_eq!(i.get("typed_string").unwrap(), Value::Int(13));
    assert!(i.set("typed_string", "x").is_err());
}

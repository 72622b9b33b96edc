//! Integration tests for attribute builders and contexts
//!
//! Tests declaration, defaults, fan-out, and reuse of shared attributes.

use blueprint_foundation::{ErrorKind, Type, Value, value_map};
use blueprint_structure::{
    AsJson, AttributeBuilder, AttributeContext, Declare, DefaultValue, Defaults, Side, StructType,
};

// =============================================================================
// Builders
// =============================================================================

#[test]
fn builder_chain_configures_one_attribute() {
    let mut b = AttributeBuilder::new();
    b.attr("score?")
        .unwrap()
        .private(&[Side::Set])
        .init(false)
        .alias(&["points"])
        .unwrap();
    let attr = b.into_attribute();
    assert_eq!(attr.name(), Some("score"));
    assert!(attr.is_optional());
    assert!(attr.private_set());
    assert!(!attr.init());
    assert_eq!(attr.aliases().len(), 1);
}

#[test]
fn invalid_names_and_aliases_are_naming_errors() {
    let mut b = AttributeBuilder::new();
    assert!(b.attr("has space").unwrap_err().is_naming());
    assert!(b.attr("ok").unwrap().alias(&["0bad"]).unwrap_err().is_naming());
}

#[test]
fn type_then_struct_is_rejected() {
    let inner = StructType::anonymous(|_| Ok(())).unwrap();
    let mut b = AttributeBuilder::new();
    b.attr("x").unwrap().ty(Type::hash()).unwrap();
    let err = b.structure(&inner).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Argument(_)));
}

// =============================================================================
// Contexts
// =============================================================================

#[test]
fn shared_attributes_are_reused_by_copy() {
    let mut shared = AttributeContext::new();
    let optional_int = shared
        .attr_with("count", Some(Type::integer()), DefaultValue::literal(12), |_| Ok(()))
        .unwrap()
        .attribute()
        .clone();
    let nil_or_string = shared
        .abstract_attr(Some(Type::none() | Type::string()), DefaultValue::Absent)
        .unwrap()
        .attribute()
        .clone();

    let t = StructType::define("UsesShared", |s| {
        s.using(&optional_int);
        s.using(&nil_or_string).private(&[]).name("label?")?;
        Ok(())
    })
    .unwrap();

    let label = t.schema().get("label").unwrap();
    assert!(label.private_get() && label.private_set());
    assert!(label.default_value().is_nil());
    assert!(nil_or_string.name().is_none());

    let i = t.construct(&value_map! {}).unwrap();
    assert_eq!(i.get("count").unwrap(), Value::Int(12));
}

#[test]
fn context_defaults_seed_later_attributes() {
    let t = StructType::define("Seeded", |s| {
        s.attr("visible")?;
        s.defaults(Defaults::hidden());
        s.attr("internal?")?;
        Ok(())
    })
    .unwrap();
    let schema = t.schema();
    assert!(!schema.get("visible").unwrap().private_get());
    assert!(schema.get("internal").unwrap().private_get());
    assert!(matches!(schema.get("internal").unwrap().as_json(), AsJson::Excluded));
}

#[test]
fn defaults_from_map_drive_a_context() {
    let defaults = Defaults::from_map(&value_map! { "init" => false, "default" => "x" }).unwrap();
    let attrs = AttributeContext::scope(|c| {
        c.defaults(defaults);
        c.attrs(&["a", "b"], None, DefaultValue::Absent, |_| Ok(()))?;
        Ok(())
    })
    .unwrap();
    assert!(attrs.iter().all(|a| !a.init() && a.is_optional()));
}

#[test]
fn attrs_block_applies_to_each_name() {
    let t = StructType::define("Multi", |s| {
        s.attrs(&["a", "b"], Some(Type::string()), DefaultValue::literal("ok"), |b| {
            b.init(false);
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();
    for name in ["a", "b"] {
        let attr = t.schema().get(name).unwrap();
        assert_eq!(attr.ty(), Some(&Type::string()));
        assert!(!attr.init());
    }
    let i = t.construct(&value_map! { "a" => "ignored" }).unwrap();
    assert_eq!(i.get("a").unwrap(), Value::from("ok"));
}

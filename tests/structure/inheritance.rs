//! Integration tests for structure inheritance
//!
//! Tests schema derivation, overrides, plan ordering, and subtyping.

use std::sync::Arc;

use blueprint_foundation::{ErrorKind, Type, Value, value_map};
use blueprint_structure::{Declare, DefaultValue, StructType};

fn animal() -> Arc<StructType> {
    StructType::define("Animal", |s| {
        s.attr_with("name", Some(Type::string()), DefaultValue::Absent, |_| Ok(()))?;
        s.attr_with("legs", Some(Type::integer()), DefaultValue::literal(4), |_| Ok(()))?;
        s.attr("sound?")?;
        Ok(())
    })
    .unwrap()
}

#[test]
fn child_inherits_parent_attributes() {
    let dog = animal()
        .extend("Dog", |s| {
            s.attr("breed")?;
            Ok(())
        })
        .unwrap();
    let names: Vec<&str> = dog.schema().names().map(AsRef::as_ref).collect();
    assert_eq!(names, ["name", "legs", "sound", "breed"]);
    assert_eq!(dog.schema().own_names().len(), 1);

    let rex = dog
        .construct(&value_map! { "name" => "Rex", "breed" => "lab" })
        .unwrap();
    assert_eq!(rex.get("legs").unwrap(), Value::Int(4));
    assert_eq!(rex.get("breed").unwrap(), Value::from("lab"));
}

#[test]
fn child_requirements_are_enforced() {
    let dog = animal()
        .extend("Dog", |s| {
            s.attr("breed")?;
            Ok(())
        })
        .unwrap();
    let err = dog.construct(&value_map! { "name" => "Rex" }).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingField(ref n) if n == "breed"));
}

#[test]
fn parent_is_unchanged_by_child_definitions() {
    let parent = animal();
    let _bird = parent
        .extend("Bird", |s| {
            s.attr_with("legs", Some(Type::integer()), DefaultValue::literal(2), |_| Ok(()))?;
            s.attr("wingspan")?;
            Ok(())
        })
        .unwrap();
    assert_eq!(parent.schema().len(), 3);
    let cat = parent.construct(&value_map! { "name" => "Tom" }).unwrap();
    assert_eq!(cat.get("legs").unwrap(), Value::Int(4));
}

#[test]
fn override_replaces_the_inherited_behavior() {
    let bird = animal()
        .extend("Bird", |s| {
            s.attr_with("legs", Some(Type::integer()), DefaultValue::literal(2), |b| {
                b.init(false);
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let names: Vec<&str> = bird.schema().names().map(AsRef::as_ref).collect();
    assert_eq!(names, ["name", "legs", "sound"]);

    let steps: Vec<&str> = bird
        .constructor()
        .steps()
        .iter()
        .map(|s| s.name().as_ref())
        .collect();
    assert_eq!(steps, ["name", "sound", "legs"]);

    let tweety = bird
        .construct(&value_map! { "name" => "Tweety", "legs" => 7 })
        .unwrap();
    assert_eq!(tweety.get("legs").unwrap(), Value::Int(2));
}

#[test]
fn override_can_loosen_a_type() {
    let loose = animal()
        .extend("Loose", |s| {
            s.attr("name")?;
            Ok(())
        })
        .unwrap();
    let i = loose.construct(&value_map! { "name" => 42 }).unwrap();
    assert_eq!(i.get("name").unwrap(), Value::Int(42));
}

#[test]
fn grandchildren_chain_plans() {
    let dog = animal()
        .extend("Dog", |s| {
            s.attr("breed?")?;
            Ok(())
        })
        .unwrap();
    let puppy = dog
        .extend("Puppy", |s| {
            s.attr_with("age", Some(Type::integer()), DefaultValue::literal(0), |_| Ok(()))?;
            Ok(())
        })
        .unwrap();

    assert!(puppy.is_subtype_of(&dog));
    assert!(puppy.is_subtype_of(&animal_of(&dog)));
    let i = puppy.construct(&value_map! { "name" => "Bit" }).unwrap();
    assert_eq!(i.schema().len(), 5);
    assert_eq!(i.as_json().unwrap().len(), 5);
}

fn animal_of(t: &Arc<StructType>) -> Arc<StructType> {
    Arc::clone(t.parent().unwrap())
}

#[test]
fn subtype_instances_satisfy_parent_class_predicates() {
    let parent = animal();
    let dog = parent.extend("Dog", |_| Ok(())).unwrap();
    let owner = StructType::define("Owner", |s| {
        s.attr_with("pet", Some(Type::instance_of(parent.class())), DefaultValue::Absent, |_| Ok(()))?;
        Ok(())
    })
    .unwrap();

    let rex = dog.construct(&value_map! { "name" => "Rex" }).unwrap();
    assert!(owner.construct(&value_map! { "pet" => rex }).is_ok());
    assert!(owner.construct(&value_map! { "pet" => "Rex" }).is_err());
}

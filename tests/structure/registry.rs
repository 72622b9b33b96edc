//! Integration tests for the structure registry
//!
//! Tests named definitions, extension by name, and lazy references.

use blueprint_foundation::{ErrorKind, Value, value_map};
use blueprint_structure::{Declare, DefaultValue, Registry};

#[test]
fn mutual_references_resolve_after_both_are_defined() {
    let registry = Registry::new();
    let author = registry
        .define("Author", |s| {
            let book = s.lookup("Book")?;
            s.attr("name")?;
            s.attr_with("books", None, DefaultValue::deferred(|| Value::from(Vec::<Value>::new())), |b| {
                b.array_structure(book)?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();
    registry
        .define("Book", |s| {
            let author = s.lookup("Author")?;
            s.attr("title")?;
            s.attr("author?")?.structure(author)?;
            Ok(())
        })
        .unwrap();

    let ann = author
        .construct(&value_map! {
            "name" => "Ann",
            "books" => vec![value_map! {
                "title" => "One",
                "author" => value_map! { "name" => "Ann" },
            }],
        })
        .unwrap();

    let json = ann.as_json().unwrap();
    let books = json.get("books").and_then(Value::as_vec).unwrap();
    let first = books.get(0).and_then(Value::as_map).unwrap();
    assert_eq!(first.get("title"), Some(&Value::from("One")));
    let nested_author = first.get("author").and_then(Value::as_map).unwrap();
    assert_eq!(nested_author.get("books"), Some(&Value::from(Vec::<Value>::new())));
}

#[test]
fn unknown_reference_reports_the_name() {
    let registry = Registry::new();
    let t = registry
        .define("Holder", |s| {
            let ghost = s.lookup("Ghost")?;
            s.attr("ghost")?.structure(ghost)?;
            Ok(())
        })
        .unwrap();
    let err = t
        .construct(&value_map! { "ghost" => value_map! {} })
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedStructure(ref n) if n == "Ghost"));
    assert_eq!(err.to_string(), "uninitialized structure type 'Ghost'");
}

#[test]
fn extended_types_can_still_look_up() {
    let registry = Registry::new();
    registry
        .define("Base", |s| {
            s.attr("id")?;
            Ok(())
        })
        .unwrap();
    let child = registry
        .extend("Base", "Child", |s| {
            let base = s.lookup("Base")?;
            assert_eq!(s.parent().map(|p| p.name()), Some("Base"));
            s.attr("parent?")?.structure(base)?;
            Ok(())
        })
        .unwrap();
    let i = child
        .construct(&value_map! { "id" => 2, "parent" => value_map! { "id" => 1 } })
        .unwrap();
    assert!(i.get("parent").unwrap().as_record().is_some());
    assert_eq!(registry.names().len(), 2);
}

#[test]
fn dropped_registry_leaves_references_unresolved() {
    let registry = Registry::new();
    let t = registry
        .define("Orphan", |s| {
            let me = s.lookup("Orphan")?;
            s.attr("me?")?.structure(me)?;
            Ok(())
        })
        .unwrap();
    drop(registry);
    let err = t
        .construct(&value_map! { "me" => value_map! {} })
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedStructure(_)));
}

//! Property tests over declarations and construction.

use blueprint::foundation::ident;
use blueprint::{Attribute, AttributeContext, Declare, DefaultValue, StructType, Type, Value, value_map};
use proptest::prelude::*;

proptest! {
    #[test]
    fn naming_agrees_with_identifier_rule(name in "[A-Za-z0-9_?-]{0,10}") {
        let mut attr = Attribute::new();
        let accepted = attr.set_name(&name).is_ok();
        let base = name.strip_suffix('?').unwrap_or(&name);
        prop_assert_eq!(accepted, ident::is_identifier(base));
        if accepted {
            prop_assert_eq!(attr.name(), Some(base));
            prop_assert_eq!(attr.is_optional(), name.ends_with('?'));
        } else {
            prop_assert!(attr.name().is_none());
            prop_assert!(!attr.is_optional());
        }
    }

    #[test]
    fn fanned_out_declarations_are_independent(count in 1usize..6, n in any::<i64>()) {
        let names: Vec<String> = (0..count).map(|i| format!("field_{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        let attrs = AttributeContext::scope(|c| {
            let built = c.attrs(&refs, Some(Type::integer()), DefaultValue::literal(n), |_| Ok(()))?;
            built[0].alias(&["first"])?;
            Ok(())
        })
        .unwrap();

        prop_assert_eq!(attrs.len(), count);
        prop_assert_eq!(attrs[0].aliases().len(), 1);
        for (attr, name) in attrs.iter().zip(&names) {
            prop_assert_eq!(attr.name(), Some(name.as_str()));
            prop_assert_eq!(attr.default_value().resolve(), Some(Value::Int(n)));
        }
        prop_assert!(attrs[1..].iter().all(|a| a.aliases().is_empty()));
    }

    #[test]
    fn integer_fields_accept_only_integers(n in any::<i64>(), s in "[a-z]{1,6}") {
        let t = StructType::define("Counter", |d| {
            d.attr_with("count", Some(Type::integer()), DefaultValue::Absent, |_| Ok(()))?;
            Ok(())
        })
        .unwrap();

        let mut counter = t.construct(&value_map! { "count" => n }).unwrap();
        prop_assert_eq!(counter.get("count").unwrap(), Value::Int(n));
        prop_assert!(counter.set("count", s.as_str()).is_err());
        prop_assert_eq!(counter.get("count").unwrap(), Value::Int(n));
        let rejected = t.construct(&value_map! { "count" => s.as_str() });
        prop_assert!(rejected.is_err());
    }
}

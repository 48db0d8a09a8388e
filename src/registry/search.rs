//! Key/value search over nested JSON documents.

use serde_json::Value;
use std::collections::BTreeSet;

/// String form used when comparing a value against a search term.
///
/// Strings compare by their contents, everything else by its JSON text, so
/// `true` matches `"true"` and `2500` matches `"2500"`. Records written by
/// the Python tooling were searched with `str(v)`; `"True"`, `"None"` and
/// `"1e-05"` no longer match `true`, `null` and `1e-5`.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether any object at any depth maps `key` to a value whose string form
/// equals `value`. Arrays are descended into; scalars inside them are not
/// candidates on their own.
pub fn contains_key_value(document: &Value, key: &str, value: &str) -> bool {
    match document {
        Value::Object(map) => map.iter().any(|(k, v)| {
            (k == key && stringify(v) == value) || contains_key_value(v, key, value)
        }),
        Value::Array(items) => items.iter().any(|item| contains_key_value(item, key, value)),
        _ => false,
    }
}

/// Insert every object key found at any depth into `keys`
pub fn collect_keys_into(document: &Value, keys: &mut BTreeSet<String>) {
    match document {
        Value::Object(map) => {
            for (k, v) in map {
                keys.insert(k.clone());
                collect_keys_into(v, keys);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_keys_into(item, keys);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_match() {
        let doc = json!({"Case Name": "sand", "density": 2500});
        assert!(contains_key_value(&doc, "Case Name", "sand"));
        assert!(contains_key_value(&doc, "density", "2500"));
        assert!(!contains_key_value(&doc, "Case Name", "glass"));
        assert!(!contains_key_value(&doc, "missing", "sand"));
    }

    #[test]
    fn test_nested_inside_lists() {
        let doc = json!({
            "Tests": [
                {"Name": "shear", "Points": [{"Load": 1.5}, {"Load": 3.0}]},
                "loose scalar"
            ]
        });
        assert!(contains_key_value(&doc, "Name", "shear"));
        assert!(contains_key_value(&doc, "Load", "3.0"));
        assert!(!contains_key_value(&doc, "Tests", "loose scalar"));
    }

    #[test]
    fn test_key_match_with_container_value_recurses() {
        let doc = json!({"x": {"x": "deep"}});
        assert!(contains_key_value(&doc, "x", "deep"));
    }

    #[test]
    fn test_stringify_rules() {
        assert_eq!(stringify(&json!("text")), "text");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!(null)), "null");
        assert_eq!(stringify(&json!(0.25)), "0.25");
        assert_eq!(stringify(&json!([1, 2])), "[1,2]");
        assert_eq!(stringify(&json!(1e-5)), "1e-5");
        assert!(!contains_key_value(&json!({"dry": true}), "dry", "True"));
        assert!(!contains_key_value(&json!({"note": null}), "note", "None"));
    }

    #[test]
    fn test_collect_keys() {
        let doc = json!({"a": {"b": [{"c": 1}]}, "d": 2});
        let mut keys = BTreeSet::new();
        collect_keys_into(&doc, &mut keys);
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// A pair buried under any number of list/object layers is found
            #[test]
            fn test_found_at_any_depth(depth in 0usize..8, key in "[a-z]{1,8}", value in "[a-z0-9]{0,8}") {
                let mut doc = json!({ key.clone(): value.clone() });
                for level in 0..depth {
                    doc = if level % 2 == 0 { json!([doc]) } else { json!({"wrap": doc}) };
                }
                prop_assert!(contains_key_value(&doc, &key, &value));
            }

            /// A different value never matches
            #[test]
            fn test_other_value_not_found(key in "[a-z]{1,8}", value in "[a-z]{1,8}") {
                let doc = json!({ key.clone(): format!("{}x", value) });
                prop_assert!(!contains_key_value(&doc, &key, &value));
            }
        }
    }
}

//! Property-based tests for merging and validation.

use super::{ConfigDocument, ConfigMerger, ConfigValidator};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// Leaf values: no mappings, so they are always replaced on merge.
fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z]{0,8}".prop_map(Value::String),
        prop::collection::vec(any::<u8>().prop_map(|n| json!(n)), 0..3).prop_map(Value::Array),
    ]
}

// Nested mappings up to three levels deep.
fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-e]", inner, 0..4)
            .prop_map(|map| Value::Object(map.into_iter().collect::<Map<String, Value>>()))
    })
}

fn object_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-e]", value_strategy(), 0..4)
        .prop_map(|map| Value::Object(map.into_iter().collect()))
}

/// Collects every leaf path of a value. Empty mappings have no leaves.
fn leaf_paths(value: &Value, prefix: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                leaf_paths(child, &format!("{prefix}/{key}"), out);
            }
        }
        _ => out.push(prefix.to_string()),
    }
}

/// Prefixes every top-level key so the three inputs never share a path.
fn namespaced(value: &Value, namespace: &str) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (format!("{namespace}{k}"), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // merge(merge(A, B), C) == merge(A, merge(B, C)) on disjoint keys.
    #[test]
    fn merge_associative_on_disjoint_keys(
        a in object_strategy(),
        b in object_strategy(),
        c in object_strategy(),
    ) {
        let (a, b, c) = (namespaced(&a, "a_"), namespaced(&b, "b_"), namespaced(&c, "c_"));
        let left = ConfigMerger::merge(&ConfigMerger::merge(&a, &b), &c);
        let right = ConfigMerger::merge(&a, &ConfigMerger::merge(&b, &c));
        prop_assert_eq!(left, right);
    }

    // Every leaf of the overlay is present, unchanged, in the result.
    #[test]
    fn merge_overlay_leaves_win(base in object_strategy(), overlay in object_strategy()) {
        let merged = ConfigMerger::merge(&base, &overlay);
        let mut paths = Vec::new();
        leaf_paths(&overlay, "", &mut paths);
        for path in &paths {
            prop_assert_eq!(merged.pointer(path), overlay.pointer(path));
        }
    }

    // Merging a value over itself changes nothing.
    #[test]
    fn merge_idempotent(value in object_strategy()) {
        prop_assert_eq!(ConfigMerger::merge(&value, &value), value);
    }

    // Validation has no hidden state: same document, same report.
    #[test]
    fn validation_repeatable(value in object_strategy(), version in "[0-9]\\.[0-9]\\.[0-9]|[0-9]\\.[0-9]") {
        let mut value = value;
        if let Value::Object(map) = &mut value {
            map.insert("version".to_string(), Value::String(version));
        }
        let document = ConfigDocument::from_value(value).unwrap();
        let validator = ConfigValidator::new();
        prop_assert_eq!(validator.validate(&document), validator.validate(&document));
    }
}

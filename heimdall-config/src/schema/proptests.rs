//! Property-based tests for schema inference.

use super::{infer, map_type, DeclarationEntry, DeclarationExtractor, SchemaType};
use proptest::prelude::*;

const TYPE_TABLE: &[(&str, SchemaType)] = &[
    ("string", SchemaType::String),
    ("int", SchemaType::Integer),
    ("real", SchemaType::Number),
    ("double", SchemaType::Number),
    ("bool", SchemaType::Boolean),
    ("var", SchemaType::Object),
    ("list", SchemaType::Array),
    ("color", SchemaType::String),
];

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][A-Za-z0-9_]{0,15}"
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    // Every table entry maps exactly, whatever the default literal.
    #[test]
    fn mapped_types_follow_table(index in 0..TYPE_TABLE.len(), literal in ".{0,20}") {
        let (raw, expected) = TYPE_TABLE[index];
        prop_assert_eq!(infer(raw, &literal).schema_type, expected);
    }

    // Anything outside the table resolves to string.
    #[test]
    fn unmapped_types_are_strings(raw in identifier()) {
        prop_assume!(!TYPE_TABLE.iter().any(|(name, _)| *name == raw));
        prop_assert_eq!(map_type(&raw), SchemaType::String);
    }

    // A parsed default always has the node's own type.
    #[test]
    fn defaults_match_node_type(index in 0..TYPE_TABLE.len(), literal in ".{0,20}") {
        let node = infer(TYPE_TABLE[index].0, &literal);
        if let Some(default) = &node.default {
            prop_assert!(node.schema_type.matches(default));
        }
    }

    // Integer literals survive extraction and inference unchanged.
    #[test]
    fn integer_declarations_round_trip(name in identifier(), value in any::<i32>()) {
        let source = format!("QtObject {{\n    property int {name}: {value}\n}}\n");
        let extraction = DeclarationExtractor::new().extract(&source).unwrap();
        let DeclarationEntry::Property(declaration) = &extraction.properties[name.as_str()] else {
            panic!("expected a plain declaration");
        };
        let node = infer(&declaration.type_name, &declaration.default_literal);
        prop_assert_eq!(node.default, Some(serde_json::json!(value)));
    }

    // Arbitrary input never panics; it either extracts or reports a parse error.
    #[test]
    fn extractor_is_total(source in "[ -~\n]{0,200}") {
        let _ = DeclarationExtractor::new().extract(&source);
    }
}

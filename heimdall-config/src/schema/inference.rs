//! Type and constraint inference for raw declarations.

use serde_json::Value;

use super::extractor::{Declaration, DeclarationEntry, DeclarationMap};
use super::literal::{clean, parse_literal, parse_migrated_literal};
use super::node::{Properties, SchemaNode, SchemaType};

/// Pattern applied to `color` properties: `#RRGGBB` or `#RRGGBBAA`.
pub const COLOR_PATTERN: &str = "^#[0-9A-Fa-f]{6}([0-9A-Fa-f]{2})?$";

/// Upper bound inferred for duration and delay properties, in milliseconds.
pub const MAX_DURATION_MS: f64 = 10_000.0;

/// Maps a source type name onto a schema type.
///
/// Generic arguments are ignored (`list<string>` maps like `list`). Unknown
/// names map to [`SchemaType::String`].
///
/// # Examples
///
/// ```
/// use heimdall_config::schema::{map_type, SchemaType};
///
/// assert_eq!(map_type("real"), SchemaType::Number);
/// assert_eq!(map_type("list<string>"), SchemaType::Array);
/// assert_eq!(map_type("Item"), SchemaType::String);
/// ```
#[must_use]
pub fn map_type(raw_type: &str) -> SchemaType {
    match base_type(raw_type) {
        "int" => SchemaType::Integer,
        "real" | "double" => SchemaType::Number,
        "bool" => SchemaType::Boolean,
        "var" => SchemaType::Object,
        "list" => SchemaType::Array,
        _ => SchemaType::String,
    }
}

fn base_type(raw_type: &str) -> &str {
    raw_type.split('<').next().unwrap_or(raw_type).trim()
}

/// Converts one raw declaration into a schema node.
///
/// The default is best-effort: anything that does not parse as the resolved
/// type, and empty `{}` / `[]` literals, leave `default` unset. Range
/// constraints come from substrings of the raw type name.
///
/// # Examples
///
/// ```
/// use heimdall_config::schema::{infer, SchemaType};
/// use serde_json::json;
///
/// let node = infer("int", "30");
/// assert_eq!(node.schema_type, SchemaType::Integer);
/// assert_eq!(node.default, Some(json!(30)));
///
/// let color = infer("color", "\"#ff0000\"");
/// assert_eq!(color.format.as_deref(), Some("color"));
/// ```
#[must_use]
pub fn infer(raw_type: &str, raw_default: &str) -> SchemaNode {
    let schema_type = map_type(raw_type);
    let mut node = SchemaNode::new(schema_type);

    if base_type(raw_type) == "color" {
        node = node.with_format("color").with_pattern(COLOR_PATTERN);
    }

    if !is_empty_container(raw_default) {
        node.default = parse_literal(schema_type, raw_default);
    }

    let lowered = raw_type.to_lowercase();
    if lowered.contains("duration") || lowered.contains("delay") {
        node = node.with_range(Some(0.0), Some(MAX_DURATION_MS));
    } else if lowered.contains("opacity") {
        node = node.with_range(Some(0.0), Some(1.0));
    } else if lowered.contains("size") && schema_type.is_numeric() {
        node.minimum = Some(0.0);
    }

    node
}

fn is_empty_container(literal: &str) -> bool {
    let compact: String = clean(literal)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    compact == "{}" || compact == "[]"
}

/// Infers a node for a declaration, carrying its comment as the description.
#[must_use]
pub fn infer_declaration(declaration: &Declaration) -> SchemaNode {
    let mut node = infer(&declaration.type_name, &declaration.default_literal);
    node.description.clone_from(&declaration.comment);
    node
}

/// Infers a whole scope of declarations into a property map.
///
/// Nested object blocks become object nodes whose properties are inferred
/// recursively.
#[must_use]
pub fn infer_properties(declarations: &DeclarationMap) -> Properties {
    declarations
        .iter()
        .map(|(name, entry)| {
            let node = match entry {
                DeclarationEntry::Property(declaration) => infer_declaration(declaration),
                DeclarationEntry::Object(object) => {
                    let mut node = SchemaNode::object(infer_properties(&object.properties));
                    node.description.clone_from(&object.comment);
                    node
                }
            };
            (name.clone(), node)
        })
        .collect()
}

/// Converts a scope of declarations into document values.
///
/// Used by migration: every declaration whose literal converts with
/// [`parse_migrated_literal`] becomes a value, and nested blocks become nested
/// mappings. Unlike schema defaults, empty `{}` / `[]` literals are kept.
#[must_use]
pub fn declarations_to_values(declarations: &DeclarationMap) -> serde_json::Map<String, Value> {
    let mut values = serde_json::Map::new();
    for (name, entry) in declarations {
        let value = match entry {
            DeclarationEntry::Property(declaration) => {
                parse_migrated_literal(&declaration.type_name, &declaration.default_literal)
            }
            DeclarationEntry::Object(object) => {
                Some(Value::Object(declarations_to_values(&object.properties)))
            }
        };
        if let Some(value) = value {
            values.insert(name.clone(), value);
        }
    }
    values
}

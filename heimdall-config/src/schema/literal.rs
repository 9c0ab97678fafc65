//! Best-effort conversion of raw declaration literals into JSON values.
//!
//! [`parse_literal`] gives schema defaults, keyed on the inferred schema
//! type. [`parse_migrated_literal`] gives migrated document values, keyed on
//! the raw declared type. Every failure is `None`: a literal that cannot be
//! understood simply contributes no value.

use serde_json::{Number, Value};

use super::node::SchemaType;

/// Removes a trailing `;` and surrounding whitespace.
#[must_use]
pub fn clean(literal: &str) -> &str {
    literal.trim().trim_end_matches(';').trim_end()
}

/// Strips one pair of matching surrounding quotes, if present.
///
/// # Examples
///
/// ```
/// use heimdall_config::schema::literal::unquote;
///
/// assert_eq!(unquote("\"kitty\""), "kitty");
/// assert_eq!(unquote("'x'"), "x");
/// assert_eq!(unquote("Qt.rgba(0, 0, 0, 1)"), "Qt.rgba(0, 0, 0, 1)");
/// ```
#[must_use]
pub fn unquote(literal: &str) -> &str {
    for quote in ['"', '\''] {
        if literal.len() >= 2 && literal.starts_with(quote) && literal.ends_with(quote) {
            return &literal[1..literal.len() - 1];
        }
    }
    literal
}

/// Parses `literal` as a value of `schema_type`.
///
/// - strings and colors: surrounding quotes stripped, anything else kept raw
/// - integers and numbers: locale-independent decimal parsing
/// - booleans: case-insensitive `true` or `1` is true, anything else false
/// - arrays and objects: only bracket/brace-delimited JSON is accepted
///
/// An empty literal yields `None` for every type.
///
/// # Examples
///
/// ```
/// use heimdall_config::schema::{literal::parse_literal, SchemaType};
/// use serde_json::json;
///
/// assert_eq!(parse_literal(SchemaType::Integer, "30;"), Some(json!(30)));
/// assert_eq!(parse_literal(SchemaType::Boolean, "TRUE"), Some(json!(true)));
/// assert_eq!(parse_literal(SchemaType::Integer, "parent.height"), None);
/// assert_eq!(parse_literal(SchemaType::Array, "Config.items"), None);
/// ```
#[must_use]
pub fn parse_literal(schema_type: SchemaType, literal: &str) -> Option<Value> {
    let literal = clean(literal);
    if literal.is_empty() {
        return None;
    }

    match schema_type {
        SchemaType::String => Some(Value::String(unquote(literal).to_string())),
        SchemaType::Integer => literal.parse::<i64>().ok().map(Value::from),
        SchemaType::Number => literal
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        SchemaType::Boolean => {
            let lowered = literal.to_ascii_lowercase();
            Some(Value::Bool(lowered == "true" || lowered == "1"))
        }
        SchemaType::Array => delimited_json(literal, '[', ']').filter(Value::is_array),
        SchemaType::Object => delimited_json(literal, '{', '}').filter(Value::is_object),
    }
}

/// Parses `literal` as a migrated document value for the raw `type_name`.
///
/// `string`, `int`, `real`, `double` and `bool` convert as in
/// [`parse_literal`]. Any other declared type keeps its literal only when it
/// is valid JSON of any shape. A `var` list or number survives, while an
/// expression such as `Colours.palette.m3primary` is dropped. JSON `null`
/// contributes no value.
///
/// # Examples
///
/// ```
/// use heimdall_config::schema::literal::parse_migrated_literal;
/// use serde_json::json;
///
/// assert_eq!(parse_migrated_literal("var", r#"["kitty"]"#), Some(json!(["kitty"])));
/// assert_eq!(parse_migrated_literal("var", "8"), Some(json!(8)));
/// assert_eq!(parse_migrated_literal("color", "Colours.palette.m3primary"), None);
/// assert_eq!(parse_migrated_literal("string", "Colours.palette.m3primary"), Some(json!("Colours.palette.m3primary")));
/// ```
#[must_use]
pub fn parse_migrated_literal(type_name: &str, literal: &str) -> Option<Value> {
    let primitive = match type_name.trim() {
        "string" => SchemaType::String,
        "int" => SchemaType::Integer,
        "real" | "double" => SchemaType::Number,
        "bool" => SchemaType::Boolean,
        _ => {
            return serde_json::from_str(clean(literal))
                .ok()
                .filter(|value: &Value| !value.is_null());
        }
    };
    parse_literal(primitive, literal)
}

fn delimited_json(literal: &str, open: char, close: char) -> Option<Value> {
    if literal.starts_with(open) && literal.ends_with(close) {
        serde_json::from_str(literal).ok()
    } else {
        None
    }
}

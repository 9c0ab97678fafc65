//! TypeScript definitions for editor tooling.

use std::fmt::Write as _;

use super::assembler::AssembledSchema;
use super::node::{SchemaNode, SchemaType};

/// Renders a `HeimdallConfig` interface plus one interface per module.
///
/// # Examples
///
/// ```
/// use heimdall_config::schema::{render_typescript, AssembledSchema, Properties, SchemaNode, SchemaType};
///
/// let mut bar = SchemaNode::new(SchemaType::Object);
/// bar.insert_property("height", SchemaNode::new(SchemaType::Integer));
/// let mut modules = Properties::new();
/// modules.insert("bar".to_string(), bar);
///
/// let ts = render_typescript(&AssembledSchema::new(modules, Vec::new()));
/// assert!(ts.contains("bar?: BarConfig;"));
/// assert!(ts.contains("height?: number;"));
/// ```
#[must_use]
pub fn render_typescript(schema: &AssembledSchema) -> String {
    let mut out = String::from(
        "// Auto-generated TypeScript definitions for Heimdall configuration\n\n",
    );

    out.push_str("export interface HeimdallConfig {\n");
    out.push_str("  version: string;\n");
    out.push_str("  meta?: {\n");
    out.push_str("    profile?: string;\n");
    out.push_str("    created?: string;\n");
    out.push_str("    modified?: string;\n");
    out.push_str("  };\n");
    out.push_str("  modules?: {\n");
    for name in schema.modules().keys() {
        let _ = writeln!(out, "    {name}?: {};", interface_name(name));
    }
    out.push_str("  };\n");
    out.push_str("}\n");

    for (name, node) in schema.modules() {
        out.push('\n');
        if let Some(description) = &node.description {
            let _ = writeln!(out, "/** {description} */");
        }
        let _ = writeln!(out, "export interface {} {}", interface_name(name), body(node, 0));
    }

    out
}

/// `controlCenter` -> `ControlCenterConfig`.
fn interface_name(module: &str) -> String {
    let mut chars = module.chars();
    let head = chars
        .next()
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_default();
    format!("{head}{}Config", chars.as_str())
}

fn type_expr(node: &SchemaNode, depth: usize) -> String {
    match node.schema_type {
        SchemaType::String => "string".to_string(),
        SchemaType::Integer | SchemaType::Number => "number".to_string(),
        SchemaType::Boolean => "boolean".to_string(),
        SchemaType::Array => "unknown[]".to_string(),
        SchemaType::Object => match node.properties() {
            Some(properties) if !properties.is_empty() => body(node, depth),
            _ => "Record<string, unknown>".to_string(),
        },
    }
}

fn body(node: &SchemaNode, depth: usize) -> String {
    let indent = "  ".repeat(depth + 1);
    let mut out = String::from("{\n");
    for (name, child) in node.properties().into_iter().flatten() {
        if let Some(description) = &child.description {
            let _ = writeln!(out, "{indent}/** {description} */");
        }
        let key = if name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            name.clone()
        } else {
            format!("\"{name}\"")
        };
        let _ = writeln!(out, "{indent}{key}?: {};", type_expr(child, depth + 1));
    }
    out.push_str(&"  ".repeat(depth));
    out.push('}');
    out
}

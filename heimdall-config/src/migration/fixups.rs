//! Post-merge repairs. Running the pass twice gives the same document.

use serde_json::Value;

use super::defaults::{
    appearance_defaults, bar_defaults, default_commands, default_logout, USER_PLACEHOLDER,
};
use crate::config::ConfigDocument;

/// Applies every fix-up to `document`.
///
/// - `commands.logout` is set to the default when missing or empty; an empty
///   user argument (third element) is replaced with the user placeholder
/// - each well-known command is added if absent
/// - an empty or missing `appearance` or `bar` is replaced by the complete
///   built-in block
///
/// # Examples
///
/// ```
/// use heimdall_config::config::ConfigDocument;
/// use heimdall_config::migration::apply_fixups;
/// use serde_json::json;
///
/// let mut doc = ConfigDocument::from_value(json!({
///     "version": "1.0.0",
///     "commands": {"logout": ["loginctl", "terminate-user", ""]}
/// })).unwrap();
/// apply_fixups(&mut doc);
///
/// assert_eq!(doc.get_path("commands.logout"), Some(&json!(["loginctl", "terminate-user", "${USER}"])));
/// assert_eq!(doc.get_path("commands.terminal"), Some(&json!("kitty")));
/// ```
pub fn apply_fixups(document: &mut ConfigDocument) {
    let commands = document.section_mut("commands");

    match commands.get_mut("logout") {
        Some(logout) if !is_empty(logout) => {
            if let Some(user) = logout.as_array_mut().and_then(|parts| parts.get_mut(2)) {
                if user.as_str() == Some("") {
                    log::debug!("filling empty logout user argument");
                    *user = Value::String(USER_PLACEHOLDER.to_string());
                }
            }
        }
        _ => {
            commands.insert("logout".to_string(), default_logout());
        }
    }

    for (name, command) in default_commands() {
        if !commands.contains_key(name) {
            commands.insert(name.to_string(), command);
        }
    }

    if document.is_section_empty("appearance") {
        log::debug!("installing default appearance block");
        document.insert("appearance", appearance_defaults());
    }
    if document.is_section_empty("bar") {
        log::debug!("installing default bar block");
        document.insert("bar", bar_defaults());
    }
}

/// Empty in the loose sense of "nothing configured".
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

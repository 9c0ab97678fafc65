//! The versioned configuration document.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::merger::ConfigMerger;
use crate::error::{Error, Result};

/// Schema version written by this crate.
pub const CURRENT_VERSION: &str = "1.0.0";

/// Format every `version` must match.
pub const VERSION_PATTERN: &str = r"^\d+\.\d+\.\d+$";

/// Top-level sections of a document, in canonical order.
pub const SECTIONS: [&str; 8] = [
    "system",
    "appearance",
    "bar",
    "modules",
    "services",
    "commands",
    "wallpaper",
    "hotReload",
];

/// An ordered JSON mapping holding one shell configuration.
///
/// Only the top level is required to be a mapping; section contents are
/// checked by [`ConfigValidator`](super::ConfigValidator).
///
/// # Examples
///
/// ```
/// use heimdall_config::config::ConfigDocument;
/// use serde_json::json;
///
/// let mut doc: ConfigDocument = r#"{"version": "1.0.0", "bar": {"height": 30}}"#.parse().unwrap();
/// assert_eq!(doc.version(), Some("1.0.0"));
/// assert_eq!(doc.get_path("bar.height"), Some(&json!(30)));
///
/// doc.merge_at("bar", json!({"position": "top"}));
/// assert_eq!(doc.get_path("bar.height"), Some(&json!(30)));
/// assert_eq!(doc.get_path("bar.position"), Some(&json!("top")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] for any non-object value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::InvalidDocument {
                reason: format!("top level must be an object, found {}", kind(&other)),
            }),
        }
    }

    /// Unwraps into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// The top-level mapping.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The top-level mapping, mutably.
    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    /// The `version` string, if present and a string.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.0.get("version").and_then(Value::as_str)
    }

    /// A top-level value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets a top-level value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Looks up a value by dotted path (`"modules.dashboard.enabled"`).
    #[must_use]
    pub fn get_path(&self, dotted_path: &str) -> Option<&Value> {
        let mut segments = dotted_path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.0.get(first)?, |value, segment| {
            value.as_object()?.get(segment)
        })
    }

    /// Sets the value at a dotted path, creating intermediate mappings.
    ///
    /// Any non-mapping value standing in the way is replaced by a mapping.
    pub fn set_path(&mut self, dotted_path: &str, value: Value) {
        let segments: Vec<&str> = dotted_path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current = &mut self.0;
        for segment in parents {
            let slot = current
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(map) = slot else {
                return;
            };
            current = map;
        }
        current.insert((*last).to_string(), value);
    }

    /// Deep-merges `overlay` into the value at a dotted path.
    ///
    /// A missing destination is simply set to `overlay`.
    pub fn merge_at(&mut self, dotted_path: &str, overlay: Value) {
        match self.get_path_mut(dotted_path) {
            Some(existing) => ConfigMerger::merge_into(existing, &overlay),
            None => self.set_path(dotted_path, overlay),
        }
    }

    fn get_path_mut(&mut self, dotted_path: &str) -> Option<&mut Value> {
        let mut segments = dotted_path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.0.get_mut(first)?, |value, segment| {
            value.as_object_mut()?.get_mut(segment)
        })
    }

    /// The mapping stored under a top-level key, created (or replacing a
    /// non-mapping value) if needed.
    pub fn section_mut(&mut self, key: &str) -> &mut Map<String, Value> {
        let slot = self
            .0
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        match slot {
            Value::Object(map) => map,
            _ => unreachable!("slot was just made an object"),
        }
    }

    /// True if a top-level key is absent or holds an empty mapping.
    #[must_use]
    pub fn is_section_empty(&self, key: &str) -> bool {
        match self.0.get(key) {
            None => true,
            Some(Value::Object(map)) => map.is_empty(),
            Some(_) => false,
        }
    }

    /// Serializes with two-space indentation and a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.0)?;
        text.push('\n');
        Ok(text)
    }
}

impl FromStr for ConfigDocument {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_value(value)
    }
}

impl From<Map<String, Value>> for ConfigDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// True if `version` matches [`VERSION_PATTERN`]: three dot-separated runs
/// of decimal digits.
///
/// # Examples
///
/// ```
/// use heimdall_config::config::is_valid_version;
///
/// assert!(is_valid_version("1.0.0"));
/// assert!(!is_valid_version("2.0"));
/// assert!(!is_valid_version("1.0.0-beta"));
/// assert!(!is_valid_version("\u{b2}.0.0"));
/// ```
#[must_use]
pub fn is_valid_version(version: &str) -> bool {
    static VERSION_RE: OnceLock<Option<Regex>> = OnceLock::new();
    VERSION_RE
        .get_or_init(|| Regex::new(VERSION_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(version))
}

/// Short name of a JSON value's kind, for messages.
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

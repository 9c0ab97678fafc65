//! Cross-field rules layered on top of the module schemas.
//!
//! Rules are keyed by dotted paths into a configuration document. They never
//! change the schema tree; they are rendered into the JSON Schema output
//! (`allOf` / `dependencies`) and evaluated by the validator.

use serde_json::{json, Map, Value};

use crate::config::{ConfigDocument, ConfigMerger, ValidationIssue};

/// A rule relating two fields of a configuration document.
#[derive(Debug, Clone, PartialEq)]
pub enum CrossFieldRule {
    /// When `when` equals `equals`, the field at `then` is documented by `note`.
    ///
    /// A document that still sets `then` while the condition holds gets a
    /// warning carrying the note.
    Conditional {
        /// Dotted path of the condition field.
        when: String,
        /// Value that triggers the rule.
        equals: Value,
        /// Dotted path of the affected field.
        then: String,
        /// Explanation attached to the affected field.
        note: String,
    },
    /// When `when` equals `equals`, `requires` must be a string of at least
    /// `min_length` characters.
    Dependency {
        /// Dotted path of the condition field.
        when: String,
        /// Value that triggers the rule.
        equals: Value,
        /// Dotted path of the required field.
        requires: String,
        /// Minimum string length of the required field.
        min_length: usize,
    },
}

impl CrossFieldRule {
    /// The rules every Heimdall schema carries.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::Conditional {
                when: "modules.animation.enabled".to_string(),
                equals: Value::Bool(false),
                then: "modules.animation.durations".to_string(),
                note: "Animation durations are ignored when animations are disabled".to_string(),
            },
            Self::Dependency {
                when: "modules.servicesIntegration.weather.enabled".to_string(),
                equals: Value::Bool(true),
                requires: "modules.servicesIntegration.weather.apiKey".to_string(),
                min_length: 1,
            },
        ]
    }

    /// Checks the rule against a document.
    ///
    /// Returns an error issue for a broken dependency, a warning for a
    /// conditional whose target is still set, and `None` otherwise.
    #[must_use]
    pub fn evaluate(&self, document: &ConfigDocument) -> Option<ValidationIssue> {
        match self {
            Self::Conditional {
                when,
                equals,
                then,
                note,
            } => {
                let triggered = document.get_path(when) == Some(equals);
                (triggered && document.get_path(then).is_some())
                    .then(|| ValidationIssue::warning(then.clone(), format!("{then}: {note}")))
            }
            Self::Dependency {
                when,
                equals,
                requires,
                min_length,
            } => {
                if document.get_path(when) != Some(equals) {
                    return None;
                }
                let length = document
                    .get_path(requires)
                    .and_then(Value::as_str)
                    .map(|s| s.chars().count());
                match length {
                    Some(length) if length >= *min_length => None,
                    _ => Some(ValidationIssue::error(
                        requires.clone(),
                        format!(
                            "{requires} must be a string of at least {min_length} character(s) when {when} is {equals}"
                        ),
                    )),
                }
            }
        }
    }
}

/// Wraps `leaf` in nested `properties` objects along `segments`.
fn nest(segments: &[&str], leaf: Value) -> Value {
    segments.iter().rev().fold(leaf, |inner, segment| {
        let mut properties = Map::new();
        properties.insert((*segment).to_string(), inner);
        json!({ "properties": properties })
    })
}

fn split(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

/// Renders conditional rules as a JSON Schema `allOf` array.
#[must_use]
pub fn render_all_of(rules: &[CrossFieldRule]) -> Value {
    let conditions = rules
        .iter()
        .filter_map(|rule| match rule {
            CrossFieldRule::Conditional {
                when,
                equals,
                then,
                note,
            } => Some(json!({
                "if": nest(&split(when), json!({ "const": equals })),
                "then": nest(&split(then), json!({ "description": note })),
            })),
            CrossFieldRule::Dependency { .. } => None,
        })
        .collect();
    Value::Array(conditions)
}

/// Renders dependency rules as a JSON Schema `dependencies` object.
///
/// Each rule becomes nested `properties` down to the object holding the
/// trigger field, where a `dependencies` entry constrains the required field.
/// Rules whose paths are too short to name a field and its parent are
/// skipped.
#[must_use]
pub fn render_dependencies(rules: &[CrossFieldRule]) -> Value {
    let mut dependencies = Map::new();

    for rule in rules {
        let CrossFieldRule::Dependency {
            when,
            requires,
            min_length,
            ..
        } = rule
        else {
            continue;
        };

        let when = split(when);
        let requires = split(requires);
        let (Some((trigger, parent)), Some(required)) = (when.split_last(), requires.last())
        else {
            continue;
        };
        let Some((root, inner)) = parent.split_first() else {
            continue;
        };

        let constraint = json!({
            "dependencies": {
                (*trigger): { "properties": { (*required): { "minLength": min_length } } }
            }
        });
        let nested = nest(inner, constraint);
        match dependencies.get_mut(*root) {
            Some(existing) => ConfigMerger::merge_into(existing, &nested),
            None => {
                dependencies.insert((*root).to_string(), nested);
            }
        }
    }

    Value::Object(dependencies)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(value: Value) -> ConfigDocument {
        ConfigDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_conditional_warns_when_target_present() {
        let rules = CrossFieldRule::defaults();
        let doc = document(json!({
            "version": "1.0.0",
            "modules": {"animation": {"enabled": false, "durations": {"fast": 100}}}
        }));
        let issue = rules[0].evaluate(&doc).unwrap();
        assert!(issue.is_warning());
        assert_eq!(issue.path, "modules.animation.durations");
    }

    #[test]
    fn test_conditional_silent_when_condition_false() {
        let rules = CrossFieldRule::defaults();
        let doc = document(json!({
            "modules": {"animation": {"enabled": true, "durations": {"fast": 100}}}
        }));
        assert!(rules[0].evaluate(&doc).is_none());
    }

    #[test]
    fn test_dependency_requires_api_key() {
        let rules = CrossFieldRule::defaults();
        let missing = document(json!({
            "modules": {"servicesIntegration": {"weather": {"enabled": true, "apiKey": ""}}}
        }));
        let issue = rules[1].evaluate(&missing).unwrap();
        assert!(!issue.is_warning());
        assert_eq!(issue.path, "modules.servicesIntegration.weather.apiKey");

        let present = document(json!({
            "modules": {"servicesIntegration": {"weather": {"enabled": true, "apiKey": "k"}}}
        }));
        assert!(rules[1].evaluate(&present).is_none());

        let disabled = document(json!({
            "modules": {"servicesIntegration": {"weather": {"enabled": false}}}
        }));
        assert!(rules[1].evaluate(&disabled).is_none());
    }

    #[test]
    fn test_render_all_of() {
        let all_of = render_all_of(&CrossFieldRule::defaults());
        assert_eq!(all_of.as_array().map(Vec::len), Some(1));
        assert_eq!(
            all_of[0]["if"]["properties"]["modules"]["properties"]["animation"]["properties"]
                ["enabled"]["const"],
            json!(false)
        );
        assert_eq!(
            all_of[0]["then"]["properties"]["modules"]["properties"]["animation"]["properties"]
                ["durations"]["description"],
            json!("Animation durations are ignored when animations are disabled")
        );
    }

    #[test]
    fn test_render_dependencies() {
        let dependencies = render_dependencies(&CrossFieldRule::defaults());
        let weather = &dependencies["modules"]["properties"]["servicesIntegration"]["properties"]
            ["weather"];
        assert_eq!(
            weather["dependencies"]["enabled"]["properties"]["apiKey"]["minLength"],
            json!(1)
        );
    }
}

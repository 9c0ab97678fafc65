//! Configuration validation.
//!
//! Every section is checked independently and all findings accumulate in a
//! [`ValidationReport`]. Only the two `version` checks stop the run, since
//! nothing else is meaningful without a parsable version.

use std::path::Path;

use regex::Regex;
use serde_json::{Map, Value};

use super::document::{is_valid_version, kind, ConfigDocument};
use super::paths::path_exists;
use super::report::{ValidationIssue, ValidationReport};
use super::store::load_document;
use crate::error::Result;
use crate::schema::{AssembledSchema, CrossFieldRule, SchemaNode};

/// Accepted `bar.position` values.
pub const BAR_POSITIONS: &[&str] = &["top", "bottom"];

/// Accepted `wallpaper.mode` values.
pub const WALLPAPER_MODES: &[&str] = &["fill", "fit", "stretch", "center", "tile"];

/// Validates configuration documents.
///
/// The fixed structural rules always apply. A module schema and cross-field
/// rules can be layered on with [`with_schema`](Self::with_schema) and
/// [`with_rules`](Self::with_rules).
///
/// # Examples
///
/// ```
/// use heimdall_config::config::{ConfigDocument, ConfigValidator};
///
/// let doc: ConfigDocument = r#"{"version": "1.0.0", "bar": {"height": -5, "position": "left"}}"#
///     .parse()
///     .unwrap();
/// let report = ConfigValidator::new().validate(&doc);
///
/// assert!(!report.is_valid());
/// assert_eq!(report.errors[0].message, "bar.height must be a positive number");
/// assert_eq!(report.errors[1].message, "bar.position must be 'top' or 'bottom', got 'left'");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigValidator {
    schema: Option<AssembledSchema>,
    rules: Vec<CrossFieldRule>,
}

impl ConfigValidator {
    /// Creates a validator with only the fixed structural rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also checks `modules.<name>` against the module schemas.
    #[must_use]
    pub fn with_schema(mut self, schema: AssembledSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Also evaluates cross-field rules.
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<CrossFieldRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Loads a document from disk and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`](crate::Error::FileNotFound) if the file
    /// does not exist and [`Error::Json`](crate::Error::Json) or
    /// [`Error::InvalidDocument`](crate::Error::InvalidDocument) if it is not
    /// a JSON object.
    pub fn validate_file(&self, path: &Path) -> Result<ValidationReport> {
        let document = load_document(path)?;
        Ok(self.validate(&document))
    }

    /// Validates a document.
    #[must_use]
    pub fn validate(&self, document: &ConfigDocument) -> ValidationReport {
        let mut report = ValidationReport::default();

        let Some(version) = document.get("version") else {
            report.push(ValidationIssue::error(
                "version",
                "Missing required field: 'version'",
            ));
            return report;
        };
        if !version.as_str().is_some_and(is_valid_version) {
            let shown = version
                .as_str()
                .map_or_else(|| version.to_string(), str::to_string);
            report.push(ValidationIssue::error(
                "version",
                format!("Invalid version format: {shown}"),
            ));
            return report;
        }

        Checker {
            report: &mut report,
        }
        .sections(document);

        if let Some(schema) = &self.schema {
            check_modules(schema, document, &mut report);
        }

        for rule in &self.rules {
            if let Some(issue) = rule.evaluate(document) {
                report.push(issue);
            }
        }

        log::debug!(
            "validation finished: {} errors, {} warnings",
            report.errors.len(),
            report.warnings.len()
        );
        report
    }
}

/// Checks each `modules.<name>` that has a schema.
fn check_modules(
    schema: &AssembledSchema,
    document: &ConfigDocument,
    report: &mut ValidationReport,
) {
    let Some(Value::Object(modules)) = document.get("modules") else {
        return;
    };
    for (name, value) in modules {
        if let Some(node) = schema.module(name) {
            check_node(node, value, &format!("modules.{name}"), report);
        }
    }
}

/// Fixed per-section rules.
struct Checker<'r> {
    report: &'r mut ValidationReport,
}

impl Checker<'_> {
    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.report.push(ValidationIssue::error(path, message));
    }

    fn warning(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.report.push(ValidationIssue::warning(path, message));
    }

    /// The mapping at `path`, or `None` (with an error if the value exists
    /// but is not a mapping).
    fn mapping<'v>(
        &mut self,
        value: Option<&'v Value>,
        path: &str,
    ) -> Option<&'v Map<String, Value>> {
        match value? {
            Value::Object(map) => Some(map),
            other => {
                self.error(path, format!("{path} must be an object, got {}", kind(other)));
                None
            }
        }
    }

    fn sections(&mut self, document: &ConfigDocument) {
        if let Some(system) = self.mapping(document.get("system"), "system") {
            self.system(system);
        }
        if let Some(appearance) = self.mapping(document.get("appearance"), "appearance") {
            self.appearance(appearance);
        }
        if let Some(bar) = self.mapping(document.get("bar"), "bar") {
            self.bar(bar);
        }
        if let Some(modules) = self.mapping(document.get("modules"), "modules") {
            self.modules(modules);
        }
        if let Some(services) = self.mapping(document.get("services"), "services") {
            self.services(services);
        }
        if let Some(commands) = self.mapping(document.get("commands"), "commands") {
            self.commands(commands);
        }
        if let Some(wallpaper) = self.mapping(document.get("wallpaper"), "wallpaper") {
            self.wallpaper(wallpaper);
        }
        if let Some(hot_reload) = self.mapping(document.get("hotReload"), "hotReload") {
            self.hot_reload(hot_reload);
        }
    }

    fn system(&mut self, system: &Map<String, Value>) {
        if let Some(paths) = self.mapping(system.get("paths"), "system.paths") {
            for (key, path) in paths {
                match path {
                    Value::String(s) if s.is_empty() => {
                        self.warning(
                            format!("system.paths.{key}"),
                            format!("system.paths.{key} is empty"),
                        );
                    }
                    Value::String(_) => {}
                    _ => self.error(
                        format!("system.paths.{key}"),
                        format!("system.paths.{key} must be a string"),
                    ),
                }
            }
        }

        let Some(startup) = self.mapping(system.get("startup"), "system.startup") else {
            return;
        };
        let Some(sequence) = startup.get("sequence") else {
            return;
        };
        let Some(items) = sequence.as_array() else {
            self.error(
                "system.startup.sequence",
                "system.startup.sequence must be an array",
            );
            return;
        };

        for (i, item) in items.iter().enumerate() {
            let path = format!("system.startup.sequence[{i}]");
            let Some(item) = self.mapping(Some(item), &path) else {
                continue;
            };
            if !item.contains_key("name") {
                self.error(path.clone(), format!("{path} missing 'name'"));
            }
            match item.get("delay") {
                None => self.error(path.clone(), format!("{path} missing 'delay'")),
                Some(delay) if delay.as_f64().is_some_and(|d| d >= 0.0) => {}
                Some(_) => self.error(
                    format!("{path}.delay"),
                    format!("{path}.delay must be non-negative number"),
                ),
            }
        }
    }

    fn appearance(&mut self, appearance: &Map<String, Value>) {
        for section in ["rounding", "spacing", "padding"] {
            let path = format!("appearance.{section}");
            if let Some(values) = self.mapping(appearance.get(section), &path) {
                self.numeric_dict(values, &path, 0.0);
            }
        }

        if let Some(font) = self.mapping(appearance.get("font"), "appearance.font") {
            if let Some(sizes) = self.mapping(font.get("size"), "appearance.font.size") {
                self.numeric_dict(sizes, "appearance.font.size", 1.0);
            }
        }
    }

    fn numeric_dict(&mut self, values: &Map<String, Value>, path: &str, floor: f64) {
        for (key, value) in values {
            let key_path = format!("{path}.{key}");
            match value.as_f64() {
                None => self.error(key_path.clone(), format!("{key_path} must be a number")),
                Some(n) if n < floor => {
                    self.error(key_path.clone(), format!("{key_path} must be >= {floor}"));
                }
                Some(_) => {}
            }
        }
    }

    fn bar(&mut self, bar: &Map<String, Value>) {
        if let Some(height) = bar.get("height") {
            if !height.as_f64().is_some_and(|h| h > 0.0) {
                self.error("bar.height", "bar.height must be a positive number");
            }
        }

        if let Some(position) = bar.get("position") {
            let valid = position
                .as_str()
                .is_some_and(|p| BAR_POSITIONS.contains(&p));
            if !valid {
                let shown = position
                    .as_str()
                    .map_or_else(|| position.to_string(), str::to_string);
                self.error(
                    "bar.position",
                    format!("bar.position must be 'top' or 'bottom', got '{shown}'"),
                );
            }
        }
    }

    fn modules(&mut self, modules: &Map<String, Value>) {
        for (name, module) in modules {
            let path = format!("modules.{name}");
            let Value::Object(module) = module else {
                self.error(path.clone(), format!("{path} must be an object"));
                continue;
            };
            if module.get("enabled").is_some_and(|e| !e.is_boolean()) {
                self.error(
                    format!("{path}.enabled"),
                    format!("{path}.enabled must be boolean"),
                );
            }
        }
    }

    fn services(&mut self, services: &Map<String, Value>) {
        let Some(audio) = self.mapping(services.get("audio"), "services.audio") else {
            return;
        };
        if let Some(increment) = audio.get("increment") {
            if !increment.as_f64().is_some_and(|i| i > 0.0) {
                self.error(
                    "services.audio.increment",
                    "services.audio.increment must be positive number",
                );
            }
        }
    }

    fn commands(&mut self, commands: &Map<String, Value>) {
        for (name, command) in commands {
            let path = format!("commands.{name}");
            match command {
                Value::String(_) => {}
                Value::Array(parts) => {
                    for (i, part) in parts.iter().enumerate() {
                        if !part.is_string() {
                            self.error(
                                format!("{path}[{i}]"),
                                format!("{path}[{i}] must be string"),
                            );
                        }
                    }
                }
                _ => self.error(path.clone(), format!("{path} must be string or array")),
            }
        }
    }

    fn wallpaper(&mut self, wallpaper: &Map<String, Value>) {
        match wallpaper.get("current") {
            None => {}
            Some(Value::String(current)) => {
                if !path_exists(current) {
                    self.warning(
                        "wallpaper.current",
                        format!("Wallpaper file not found: {current}"),
                    );
                }
            }
            Some(_) => self.error("wallpaper.current", "wallpaper.current must be a string"),
        }

        if let Some(mode) = wallpaper.get("mode") {
            let valid = mode
                .as_str()
                .is_some_and(|m| WALLPAPER_MODES.contains(&m));
            if !valid {
                self.error(
                    "wallpaper.mode",
                    format!(
                        "wallpaper.mode must be one of [{}]",
                        WALLPAPER_MODES.join(", ")
                    ),
                );
            }
        }
    }

    fn hot_reload(&mut self, hot_reload: &Map<String, Value>) {
        if let Some(debounce) = hot_reload.get("debounceMs") {
            if !debounce.as_f64().is_some_and(|d| d >= 0.0) {
                self.error(
                    "hotReload.debounceMs",
                    "hotReload.debounceMs must be non-negative number",
                );
            }
        }

        if hot_reload.get("enabled").is_some_and(|e| !e.is_boolean()) {
            self.error("hotReload.enabled", "hotReload.enabled must be boolean");
        }
    }
}

/// Checks `value` against a schema node, recursing into known properties.
///
/// A path that already carries an error (from the fixed rules) is not
/// reported twice.
fn check_node(node: &SchemaNode, value: &Value, path: &str, report: &mut ValidationReport) {
    let mut fail = |message: String| {
        if !report.errors.iter().any(|e| e.path == path) {
            report.push(ValidationIssue::error(path, message));
        }
    };

    if !node.schema_type.matches(value) {
        fail(format!(
            "{path} must be of type {}, got {}",
            node.schema_type,
            kind(value)
        ));
        return;
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = node.minimum.filter(|&min| n < min) {
            fail(format!("{path} must be >= {min}"));
        }
        if let Some(max) = node.maximum.filter(|&max| n > max) {
            fail(format!("{path} must be <= {max}"));
        }
    }

    if let Some(allowed) = &node.enum_values {
        if !allowed.contains(value) {
            let shown: Vec<String> = allowed.iter().map(Value::to_string).collect();
            fail(format!("{path} must be one of [{}]", shown.join(", ")));
        }
    }

    if let (Some(pattern), Some(text)) = (&node.pattern, value.as_str()) {
        match Regex::new(pattern) {
            Ok(re) if !re.is_match(text) => {
                fail(format!("{path} must match pattern {pattern}"));
            }
            Ok(_) => {}
            Err(e) => log::debug!("{path}: ignoring unusable pattern {pattern}: {e}"),
        }
    }

    if let (Some(properties), Value::Object(map)) = (node.properties(), value) {
        for (key, child) in properties {
            if let Some(child_value) = map.get(key) {
                check_node(child, child_value, &format!("{path}.{key}"), report);
            }
        }
    }
}

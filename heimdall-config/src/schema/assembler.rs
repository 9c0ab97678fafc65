//! Assembly of the full configuration schema from a directory of
//! declaration files.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use super::extractor::DeclarationExtractor;
use super::inference::infer_properties;
use super::node::{Properties, SchemaNode};
use super::rules::{render_all_of, render_dependencies, CrossFieldRule};
use crate::config::VERSION_PATTERN;
use crate::error::{Error, Result};

/// `$schema` URI of the generated document.
pub const SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

/// Title of the generated document.
pub const SCHEMA_TITLE: &str = "Heimdall Configuration Schema";

/// Module names and the declaration files they are built from, in output order.
pub const MODULE_FILES: &[(&str, &str)] = &[
    ("appearance", "AppearanceConfig.qml"),
    ("general", "GeneralConfig.qml"),
    ("background", "BackgroundConfig.qml"),
    ("bar", "BarConfig.qml"),
    ("border", "BorderConfig.qml"),
    ("dashboard", "DashboardConfig.qml"),
    ("controlCenter", "ControlCenterConfig.qml"),
    ("launcher", "LauncherConfig.qml"),
    ("notifications", "NotifsConfig.qml"),
    ("osd", "OsdConfig.qml"),
    ("session", "SessionConfig.qml"),
    ("lock", "LockConfig.qml"),
    ("uiComponents", "UIComponentsConfig.qml"),
    ("animation", "AnimationConfig.qml"),
    ("servicesIntegration", "ServicesIntegrationConfig.qml"),
    ("behavior", "BehaviorConfig.qml"),
];

/// Why a module file contributed nothing to the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file does not exist.
    Missing,
    /// The file could not be read or parsed.
    Failed(String),
}

/// A module left out of the assembled schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedModule {
    /// Module name.
    pub module: String,
    /// File that was looked for.
    pub file: PathBuf,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Builds the module schema from a directory of declaration files.
///
/// # Examples
///
/// ```no_run
/// use heimdall_config::schema::SchemaAssembler;
///
/// let schema = SchemaAssembler::new("/home/user/.config/quickshell/heimdall/config")
///     .assemble()
///     .unwrap();
/// for module in schema.modules().keys() {
///     println!("{module}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SchemaAssembler {
    base_dir: PathBuf,
    modules: Vec<(String, String)>,
    rules: Vec<CrossFieldRule>,
    extractor: DeclarationExtractor,
}

impl SchemaAssembler {
    /// Creates an assembler over `base_dir` with the default module table
    /// and cross-field rules.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            modules: MODULE_FILES
                .iter()
                .map(|(module, file)| ((*module).to_string(), (*file).to_string()))
                .collect(),
            rules: CrossFieldRule::defaults(),
            extractor: DeclarationExtractor::new(),
        }
    }

    /// Replaces the module table.
    #[must_use]
    pub fn with_modules<I, M, F>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = (M, F)>,
        M: Into<String>,
        F: Into<String>,
    {
        self.modules = modules
            .into_iter()
            .map(|(module, file)| (module.into(), file.into()))
            .collect();
        self
    }

    /// Replaces the cross-field rules.
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<CrossFieldRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the declaration extractor (e.g. to enable strict duplicates).
    #[must_use]
    pub fn with_extractor(mut self, extractor: DeclarationExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Directory the module files are read from.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Builds the schema.
    ///
    /// Missing and unparseable module files are logged and recorded in
    /// [`AssembledSchema::skipped`]; they never fail the run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if the base directory does not exist.
    pub fn assemble(&self) -> Result<AssembledSchema> {
        if !self.base_dir.is_dir() {
            return Err(Error::FileNotFound {
                path: self.base_dir.clone(),
            });
        }

        let mut schema = AssembledSchema {
            modules: Properties::new(),
            rules: self.rules.clone(),
            processed: Vec::new(),
            skipped: Vec::new(),
        };

        for (module, file) in &self.modules {
            let path = self.base_dir.join(file);
            if !path.exists() {
                log::warn!("{file} not found, skipping module '{module}'");
                schema.skipped.push(SkippedModule {
                    module: module.clone(),
                    file: path,
                    reason: SkipReason::Missing,
                });
                continue;
            }

            log::info!("Processing {file}...");
            match self.extractor.extract_file(&path) {
                Ok(extraction) => {
                    let node = SchemaNode::object(infer_properties(&extraction.properties))
                        .with_description(format!("Configuration for {module} module"));
                    log::debug!(
                        "module '{module}': {} properties",
                        extraction.properties.len()
                    );
                    schema.modules.insert(module.clone(), node);
                    schema.processed.push(path);
                }
                Err(e) => {
                    log::warn!("skipping module '{module}': {e}");
                    schema.skipped.push(SkippedModule {
                        module: module.clone(),
                        file: path,
                        reason: SkipReason::Failed(e.to_string()),
                    });
                }
            }
        }

        Ok(schema)
    }
}

/// The module schemas plus the cross-field rules that apply to them.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledSchema {
    modules: Properties,
    rules: Vec<CrossFieldRule>,
    processed: Vec<PathBuf>,
    skipped: Vec<SkippedModule>,
}

impl AssembledSchema {
    /// Creates a schema directly from module nodes.
    #[must_use]
    pub fn new(modules: Properties, rules: Vec<CrossFieldRule>) -> Self {
        Self {
            modules,
            rules,
            processed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Module schemas by module name, in table order.
    #[must_use]
    pub const fn modules(&self) -> &Properties {
        &self.modules
    }

    /// Schema of one module.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&SchemaNode> {
        self.modules.get(name)
    }

    /// Cross-field rules.
    #[must_use]
    pub fn rules(&self) -> &[CrossFieldRule] {
        &self.rules
    }

    /// Files that contributed a module.
    #[must_use]
    pub fn processed(&self) -> &[PathBuf] {
        &self.processed
    }

    /// Modules that were missing or failed to parse.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedModule] {
        &self.skipped
    }

    /// Renders the JSON-Schema-shaped document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if a node cannot be serialized.
    pub fn to_json_schema(&self) -> Result<Value> {
        let modules = serde_json::to_value(SchemaNode::object(self.modules.clone()))?;

        Ok(json!({
            "$schema": SCHEMA_DIALECT,
            "title": SCHEMA_TITLE,
            "description": "Configuration schema for Heimdall quickshell",
            "type": "object",
            "properties": {
                "version": {
                    "type": "string",
                    "pattern": VERSION_PATTERN,
                    "description": "Configuration version"
                },
                "meta": {
                    "type": "object",
                    "properties": {
                        "profile": {"type": "string"},
                        "created": {"type": "string", "format": "date-time"},
                        "modified": {"type": "string", "format": "date-time"}
                    }
                },
                "modules": modules
            },
            "required": ["version"],
            "definitions": {},
            "allOf": render_all_of(&self.rules),
            "dependencies": render_dependencies(&self.rules),
        }))
    }
}

//! Mapping of legacy declaration files onto document paths.

use std::path::Path;

use crate::config::ConfigDocument;
use crate::schema::{declarations_to_values, DeclarationExtractor};

/// One legacy source file and the document path its values land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationRule {
    /// File name inside the legacy directory.
    pub source: &'static str,
    /// Dotted destination path in the document.
    pub destination: &'static str,
}

impl MigrationRule {
    /// Creates a rule.
    #[must_use]
    pub const fn new(source: &'static str, destination: &'static str) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// Rules applied to a legacy directory, in order.
pub const LEGACY_RULES: &[MigrationRule] = &[
    MigrationRule::new("AppearanceConfig.qml", "appearance"),
    MigrationRule::new("BarConfig.qml", "bar"),
    MigrationRule::new("SessionConfig.qml", "commands"),
    MigrationRule::new("ServiceConfig.qml", "services"),
    MigrationRule::new("DashboardConfig.qml", "modules.dashboard"),
    MigrationRule::new("LauncherConfig.qml", "modules.launcher"),
    MigrationRule::new("NotifsConfig.qml", "modules.notifications"),
    MigrationRule::new("LockConfig.qml", "modules.lockScreen"),
    MigrationRule::new("ControlCenterConfig.qml", "modules.controlCenter"),
];

/// What happened to each rule of a legacy migration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyMigration {
    /// Rules whose file was read and merged.
    pub applied: Vec<MigrationRule>,
    /// Rules whose file does not exist.
    pub missing: Vec<MigrationRule>,
    /// Rules whose file could not be read or parsed, with the reason.
    pub failed: Vec<(MigrationRule, String)>,
}

/// Applies `rules` from `dir` to `document`.
///
/// Each file's declarations are converted to values and deep-merged at the
/// rule's destination, so later rules overlay earlier ones. Missing and
/// unparseable files are logged and skipped.
pub fn apply_legacy_rules(
    dir: &Path,
    rules: &[MigrationRule],
    extractor: &DeclarationExtractor,
    document: &mut ConfigDocument,
) -> LegacyMigration {
    let mut outcome = LegacyMigration::default();

    for rule in rules {
        let path = dir.join(rule.source);
        if !path.exists() {
            log::debug!("{} not found, skipping", rule.source);
            outcome.missing.push(*rule);
            continue;
        }

        log::info!("  Processing {}...", rule.source);
        match extractor.extract_file(&path) {
            Ok(extraction) => {
                let values = declarations_to_values(&extraction.properties);
                document.merge_at(rule.destination, serde_json::Value::Object(values));
                outcome.applied.push(*rule);
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {e}", rule.source);
                outcome.failed.push((*rule, e.to_string()));
            }
        }
    }

    outcome
}

//! The migration run: prompt, build, repair, save.
//!
//! A run moves through these steps:
//!
//! 1. if the destination exists (and this is not a dry run), ask the
//!    [`OverwritePrompt`]; a refusal ends the run with [`Error::Cancelled`]
//! 2. build the base document
//! 3. merge in the legacy declaration directory, or else the prior JSON
//!    document, or else nothing
//! 4. apply the fix-up pass
//! 5. save with backup, or return the document for a dry run
//!
//! Problems with individual input files are logged and skipped; only the
//! prompt and the final save can fail the run.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::defaults::{base_document, timestamp};
use super::fixups::apply_fixups;
use super::rules::{apply_legacy_rules, LegacyMigration, MigrationRule, LEGACY_RULES};
use crate::config::{load_document, save_document, ConfigDocument, ConfigMerger, CURRENT_VERSION};
use crate::error::{Error, Result};
use crate::schema::DeclarationExtractor;

/// Decides whether an existing destination may be overwritten.
#[cfg_attr(test, mockall::automock)]
pub trait OverwritePrompt {
    /// Returns true if `path` may be replaced.
    fn confirm_overwrite(&mut self, path: &Path) -> bool;
}

/// A prompt that always agrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl OverwritePrompt for AssumeYes {
    fn confirm_overwrite(&mut self, _path: &Path) -> bool {
        true
    }
}

/// Options for a migration run.
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    /// Where the migrated document is written.
    pub output: PathBuf,
    /// A prior JSON document to carry forward.
    pub input: Option<PathBuf>,
    /// A directory of legacy declaration files.
    pub legacy_dir: Option<PathBuf>,
    /// File holding the path of the current wallpaper.
    pub wallpaper_state: Option<PathBuf>,
    /// Compute the document without prompting or writing.
    pub dry_run: bool,
    /// Overwrite an existing destination without asking.
    pub assume_yes: bool,
}

impl MigrateOptions {
    /// Creates options writing to `output`, starting from defaults only.
    ///
    /// # Examples
    ///
    /// ```
    /// use heimdall_config::migration::MigrateOptions;
    /// use std::path::PathBuf;
    ///
    /// let options = MigrateOptions::new(PathBuf::from("shell.json"))
    ///     .with_input(PathBuf::from("old.json"))
    ///     .with_dry_run(true);
    /// assert!(options.dry_run);
    /// assert!(!options.assume_yes);
    /// ```
    #[must_use]
    pub fn new(output: PathBuf) -> Self {
        Self {
            output,
            input: None,
            legacy_dir: None,
            wallpaper_state: None,
            dry_run: false,
            assume_yes: false,
        }
    }

    /// Sets the prior JSON document.
    #[must_use]
    pub fn with_input(mut self, input: PathBuf) -> Self {
        self.input = Some(input);
        self
    }

    /// Sets the legacy declaration directory.
    #[must_use]
    pub fn with_legacy_dir(mut self, legacy_dir: PathBuf) -> Self {
        self.legacy_dir = Some(legacy_dir);
        self
    }

    /// Sets the wallpaper state file.
    #[must_use]
    pub fn with_wallpaper_state(mut self, wallpaper_state: PathBuf) -> Self {
        self.wallpaper_state = Some(wallpaper_state);
        self
    }

    /// Sets the `dry_run` flag.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the `assume_yes` flag.
    #[must_use]
    pub const fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    /// Which input the run will use. A legacy directory wins over a prior
    /// JSON document.
    #[must_use]
    pub fn source(&self) -> MigrationSource {
        match (&self.legacy_dir, &self.input) {
            (Some(dir), _) => MigrationSource::Legacy(dir.clone()),
            (None, Some(input)) => MigrationSource::PriorJson(input.clone()),
            (None, None) => MigrationSource::Defaults,
        }
    }
}

/// The input a migration builds on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationSource {
    /// Legacy declaration files.
    Legacy(PathBuf),
    /// An earlier JSON document.
    PriorJson(PathBuf),
    /// Built-in defaults only.
    Defaults,
}

/// How a run that was not cancelled ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// The document was written.
    Completed {
        /// The written document.
        document: ConfigDocument,
        /// Where it was written.
        output: PathBuf,
        /// Where the previous destination was moved, if it existed.
        backup: Option<PathBuf>,
    },
    /// Dry run: the document that would have been written.
    DryRun {
        /// The computed document.
        document: ConfigDocument,
    },
}

impl MigrationOutcome {
    /// The migrated document.
    #[must_use]
    pub const fn document(&self) -> &ConfigDocument {
        match self {
            Self::Completed { document, .. } | Self::DryRun { document } => document,
        }
    }
}

/// Runs migrations.
///
/// # Examples
///
/// ```no_run
/// use heimdall_config::migration::{AssumeYes, MigrateOptions, Migrator};
/// use std::path::PathBuf;
///
/// let options = MigrateOptions::new(PathBuf::from("shell.json"))
///     .with_legacy_dir(PathBuf::from("config"));
/// let outcome = Migrator::new(options).run(&mut AssumeYes).unwrap();
/// println!("{}", outcome.document().version().unwrap_or_default());
/// ```
#[derive(Debug, Clone)]
pub struct Migrator {
    options: MigrateOptions,
    rules: Vec<MigrationRule>,
    extractor: DeclarationExtractor,
}

impl Migrator {
    /// Creates a migrator with the default legacy rules.
    #[must_use]
    pub fn new(options: MigrateOptions) -> Self {
        Self {
            options,
            rules: LEGACY_RULES.to_vec(),
            extractor: DeclarationExtractor::new(),
        }
    }

    /// Replaces the legacy rules.
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<MigrationRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the declaration extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: DeclarationExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// The run's options.
    #[must_use]
    pub const fn options(&self) -> &MigrateOptions {
        &self.options
    }

    /// Executes the run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if the prompt refuses to overwrite an
    /// existing destination (nothing is touched), and any error from
    /// [`save_document`].
    pub fn run(&self, prompt: &mut dyn OverwritePrompt) -> Result<MigrationOutcome> {
        let output = &self.options.output;

        if !self.options.dry_run && output.exists() {
            log::warn!("{} already exists", output.display());
            if !self.options.assume_yes && !prompt.confirm_overwrite(output) {
                log::info!("Migration cancelled");
                return Err(Error::Cancelled {
                    path: output.clone(),
                });
            }
        }

        let document = self.build();

        if self.options.dry_run {
            log::info!("Dry run: {} not written", output.display());
            return Ok(MigrationOutcome::DryRun { document });
        }

        let backup = save_document(output, &document)?;
        log::info!("Configuration saved to: {}", output.display());
        Ok(MigrationOutcome::Completed {
            document,
            output: output.clone(),
            backup,
        })
    }

    /// Builds the migrated document without touching the destination.
    #[must_use]
    pub fn build(&self) -> ConfigDocument {
        let wallpaper = self
            .options
            .wallpaper_state
            .as_deref()
            .and_then(read_wallpaper_state);
        let mut document = base_document(wallpaper.as_deref());

        match self.options.source() {
            MigrationSource::Legacy(dir) => {
                if let Some(input) = &self.options.input {
                    log::warn!(
                        "Ignoring {}: legacy directory {} takes precedence",
                        input.display(),
                        dir.display()
                    );
                }
                let outcome = self.migrate_legacy(&dir, &mut document);
                log::debug!(
                    "legacy migration: {} applied, {} missing, {} failed",
                    outcome.applied.len(),
                    outcome.missing.len(),
                    outcome.failed.len()
                );
            }
            MigrationSource::PriorJson(input) => merge_prior_json(&mut document, &input),
            MigrationSource::Defaults => log::info!("No input given, using defaults"),
        }

        apply_fixups(&mut document);
        document
    }

    fn migrate_legacy(&self, dir: &Path, document: &mut ConfigDocument) -> LegacyMigration {
        log::info!("Migrating from QML configuration files in {}...", dir.display());
        if !dir.is_dir() {
            log::warn!("Legacy directory {} does not exist", dir.display());
        }
        apply_legacy_rules(dir, &self.rules, &self.extractor, document)
    }
}

/// Deep-merges a prior document over `document` and restamps it.
///
/// A prior document that cannot be read leaves `document` unchanged.
fn merge_prior_json(document: &mut ConfigDocument, input: &Path) {
    log::info!("Migrating from existing JSON: {}", input.display());

    let prior = match load_document(input) {
        Ok(prior) => prior,
        Err(e) => {
            log::error!("Error reading input file: {e}");
            return;
        }
    };

    let mut merged = Value::Object(std::mem::take(document.as_map_mut()));
    ConfigMerger::merge_into(&mut merged, &prior.into_value());
    if let Value::Object(map) = merged {
        *document.as_map_mut() = map;
    }

    document.insert("version", Value::String(CURRENT_VERSION.to_string()));
    document.set_path("metadata.lastModified", Value::String(timestamp()));
    document.set_path("metadata.migratedFrom", Value::String("json".to_string()));
}

/// The trimmed first line of a wallpaper state file, if there is one.
fn read_wallpaper_state(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => text
            .lines()
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        Err(e) => {
            log::debug!("no wallpaper state at {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_source_precedence() {
        let options = MigrateOptions::new(PathBuf::from("out.json"));
        assert_eq!(options.source(), MigrationSource::Defaults);

        let options = options.with_input(PathBuf::from("old.json"));
        assert_eq!(
            options.source(),
            MigrationSource::PriorJson(PathBuf::from("old.json"))
        );

        let options = options.with_legacy_dir(PathBuf::from("config"));
        assert_eq!(
            options.source(),
            MigrationSource::Legacy(PathBuf::from("config"))
        );
    }

    #[test]
    fn test_defaults_only_document() {
        let dir = tempdir().unwrap();
        let document = Migrator::new(MigrateOptions::new(dir.path().join("shell.json"))).build();

        let commands = document.get("commands").and_then(Value::as_object).unwrap();
        for name in [
            "terminal",
            "browser",
            "fileManager",
            "editor",
            "shutdown",
            "reboot",
            "hibernate",
            "lock",
            "screenshot",
        ] {
            assert!(commands.contains_key(name), "missing {name}");
        }
        assert_eq!(commands["logout"][2], json!("${USER}"));
    }

    #[test]
    fn test_existing_destination_declined() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("shell.json");
        fs::write(&output, "original").unwrap();

        let mut prompt = MockOverwritePrompt::new();
        prompt
            .expect_confirm_overwrite()
            .times(1)
            .return_const(false);

        let err = Migrator::new(MigrateOptions::new(output.clone()))
            .run(&mut prompt)
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(fs::read_to_string(&output).unwrap(), "original");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_existing_destination_confirmed() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("shell.json");
        fs::write(&output, "original").unwrap();

        let mut prompt = MockOverwritePrompt::new();
        prompt
            .expect_confirm_overwrite()
            .times(1)
            .return_const(true);

        let outcome = Migrator::new(MigrateOptions::new(output.clone()))
            .run(&mut prompt)
            .unwrap();

        let MigrationOutcome::Completed { backup, .. } = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(fs::read_to_string(backup.unwrap()).unwrap(), "original");
        assert!(load_document(&output).is_ok());
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("shell.json");
        fs::write(&output, "{}").unwrap();

        let mut prompt = MockOverwritePrompt::new();
        prompt.expect_confirm_overwrite().times(0);

        let options = MigrateOptions::new(output).with_assume_yes(true);
        assert!(Migrator::new(options).run(&mut prompt).is_ok());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("shell.json");
        fs::write(&output, "original").unwrap();

        let mut prompt = MockOverwritePrompt::new();
        prompt.expect_confirm_overwrite().times(0);

        let options = MigrateOptions::new(output.clone()).with_dry_run(true);
        let outcome = Migrator::new(options).run(&mut prompt).unwrap();

        assert!(matches!(outcome, MigrationOutcome::DryRun { .. }));
        assert_eq!(fs::read_to_string(&output).unwrap(), "original");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_prior_json_is_merged_and_restamped() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("old.json");
        fs::write(
            &input,
            r#"{"version": "0.9.0", "bar": {"height": 44}, "metadata": {"profile": "work"}}"#,
        )
        .unwrap();

        let options = MigrateOptions::new(dir.path().join("shell.json")).with_input(input);
        let document = Migrator::new(options).build();

        assert_eq!(document.version(), Some(CURRENT_VERSION));
        assert_eq!(document.get_path("bar.height"), Some(&json!(44)));
        assert_eq!(document.get_path("metadata.profile"), Some(&json!("work")));
        assert_eq!(
            document.get_path("metadata.migratedFrom"),
            Some(&json!("json"))
        );
        // The prior bar was not empty, so no default block replaced it.
        assert!(document.get_path("bar.workspaces").is_none());
        // Base sections survive the merge.
        assert!(document.get_path("hotReload.debounceMs").is_some());
    }

    #[test]
    fn test_unreadable_prior_json_keeps_base() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("old.json");
        fs::write(&input, "{ broken").unwrap();

        let options = MigrateOptions::new(dir.path().join("shell.json")).with_input(input);
        let document = Migrator::new(options).build();

        assert_eq!(document.get_path("metadata.migratedFrom"), Some(&json!("qml")));
        assert_eq!(document.get_path("bar.height"), Some(&json!(30)));
    }

    #[test]
    fn test_legacy_wins_over_json() {
        let dir = tempdir().unwrap();
        let legacy = dir.path().join("config");
        fs::create_dir(&legacy).unwrap();
        fs::write(
            legacy.join("BarConfig.qml"),
            "QtObject {\n property int height: 50\n}\n",
        )
        .unwrap();
        let input = dir.path().join("old.json");
        fs::write(&input, r#"{"bar": {"height": 44}}"#).unwrap();

        let options = MigrateOptions::new(dir.path().join("shell.json"))
            .with_input(input)
            .with_legacy_dir(legacy);
        let document = Migrator::new(options).build();

        assert_eq!(document.get_path("bar.height"), Some(&json!(50)));
        assert_eq!(document.get_path("metadata.migratedFrom"), Some(&json!("qml")));
    }

    #[test]
    fn test_wallpaper_state_file() {
        let dir = tempdir().unwrap();
        let state = dir.path().join("path.txt");
        fs::write(&state, "/walls/forest.png\n").unwrap();

        let options = MigrateOptions::new(dir.path().join("shell.json")).with_wallpaper_state(state);
        let document = Migrator::new(options).build();
        assert_eq!(
            document.get_path("wallpaper.current"),
            Some(&json!("/walls/forest.png"))
        );
    }
}

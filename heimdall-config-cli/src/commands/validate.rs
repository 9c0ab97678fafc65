//! Command to validate a configuration file.

use crate::error::CliError;
use crate::utils::{resolve_optional, resolve_path, GlobalOptions};
use clap::Args;
use heimdall_config::{ConfigValidator, CrossFieldRule, SchemaAssembler};
use std::path::PathBuf;

/// Validate a configuration file.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration file to validate
    #[arg(value_name = "CONFIG", env = "HEIMDALL_CONFIG_FILE")]
    pub config: PathBuf,

    /// Also check modules against the schema built from this directory
    #[arg(long, value_name = "DIR", env = "HEIMDALL_LEGACY_DIR")]
    pub legacy_dir: Option<PathBuf>,
}

impl ValidateCommand {
    /// Execute the validate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = resolve_path(&self.config)?;
        let legacy_dir = resolve_optional(self.legacy_dir.as_deref())?;

        let mut validator = ConfigValidator::new().with_rules(CrossFieldRule::defaults());
        if let Some(dir) = legacy_dir {
            validator = validator.with_schema(SchemaAssembler::new(dir).assemble()?);
        }

        let report = validator.validate_file(&config)?;

        if !global.quiet || !report.is_valid() {
            print!("{}", report.render());
        }

        if report.is_valid() {
            Ok(())
        } else {
            Err(CliError::SemanticFailure(
                "Configuration validation failed".to_string(),
            ))
        }
    }
}

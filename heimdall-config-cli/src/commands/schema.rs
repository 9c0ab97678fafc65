//! Command to generate the configuration schema.

use crate::error::CliError;
use crate::utils::{resolve_optional, resolve_path, shorten_path, write_output, GlobalOptions};
use clap::Args;
use heimdall_config::schema::{render_typescript, SkipReason};
use heimdall_config::{CrossFieldRule, SchemaAssembler};
use std::path::PathBuf;

/// Generate the configuration schema from legacy declaration files.
#[derive(Args)]
pub struct SchemaCommand {
    /// Directory holding the legacy declaration files
    #[arg(long, value_name = "DIR", env = "HEIMDALL_LEGACY_DIR")]
    pub legacy_dir: PathBuf,

    /// Write the JSON schema here instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write TypeScript definitions to this file
    #[arg(long, value_name = "FILE")]
    pub typescript: Option<PathBuf>,
}

impl SchemaCommand {
    /// Execute the schema command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let legacy_dir = resolve_path(&self.legacy_dir)?;
        let output = resolve_optional(self.output.as_deref())?;
        let typescript = resolve_optional(self.typescript.as_deref())?;
        if output.is_some() && output == typescript {
            return Err(CliError::InvalidArguments(
                "--output and --typescript must name different files".to_string(),
            ));
        }

        // 1. Assemble the module schemas
        let schema = SchemaAssembler::new(legacy_dir)
            .with_rules(CrossFieldRule::defaults())
            .assemble()?;

        // 2. Render and write the JSON schema
        let json = schema.to_json_schema()?;
        let mut rendered =
            serde_json::to_string_pretty(&json).map_err(heimdall_config::Error::from)?;
        rendered.push('\n');
        write_output(output.as_deref(), &rendered)?;

        // 3. Optional TypeScript definitions
        if let Some(path) = &typescript {
            write_output(Some(path), &render_typescript(&schema))?;
        }

        if !global.quiet {
            eprintln!(
                "Schema generated: {} module(s), {} skipped",
                schema.modules().len(),
                schema.skipped().len()
            );
            if let Some(path) = &output {
                eprintln!("  Schema:     {}", shorten_path(path));
            }
            if let Some(path) = &typescript {
                eprintln!("  TypeScript: {}", shorten_path(path));
            }
            if global.verbose {
                for skipped in schema.skipped() {
                    let reason = match &skipped.reason {
                        SkipReason::Missing => "missing".to_string(),
                        SkipReason::Failed(reason) => reason.clone(),
                    };
                    eprintln!("  skipped {}: {reason}", skipped.module);
                }
            }
        }

        Ok(())
    }
}

//! Build script for heimdall-config-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("heimdall-config")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate, validate and migrate Heimdall shell configuration")
        .long_about(
            "Command-line tool for inferring the Heimdall configuration schema from legacy \
             declaration files, validating configuration documents and migrating old setups",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommands(vec![
            Command::new("schema")
                .about("Generate the configuration schema from legacy declaration files")
                .long_about(
                    "Infer a JSON schema (and optionally TypeScript definitions) from the \
                     legacy declaration directory",
                ),
            Command::new("validate")
                .about("Validate a configuration file")
                .long_about("Check a configuration file and print a report of errors and warnings"),
            Command::new("migrate")
                .about("Migrate legacy or earlier configuration to the current format")
                .long_about(
                    "Build the current configuration from legacy declaration files or an \
                     earlier JSON file, backing up any existing output",
                ),
            Command::new("restore")
                .about("Restore a configuration file from its newest backup")
                .long_about(
                    "Move the newest backup of a configuration file back in place, keeping the \
                     replaced file as <name>.json.replaced.<timestamp>. Running restore again \
                     steps one backup further back",
                ),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("heimdall-config.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}

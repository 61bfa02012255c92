//! CLI for the keg install pipeline.

mod commands;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use keg_core::config;
use keg_core::recipe::{self, Recipe, RecipeBook};
use semver::Version;
use std::path::PathBuf;

use commands::{run_checksum, run_completions, run_install, run_list, run_test};

/// Top-level CLI for the keg install pipeline.
#[derive(Debug, Parser)]
#[command(name = "keg")]
#[command(about = "keg: fetch, verify, install and self-test packaged tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch, verify, install and self-test a package.
    Install {
        /// Package name from the recipe book.
        package: String,
        /// Install a specific published version (default: latest).
        #[arg(long)]
        version: Option<String>,
        /// Install under this prefix instead of the configured destinations.
        #[arg(long)]
        prefix: Option<PathBuf>,
    },

    /// Run a package's post-install checks against the installed binary.
    Test {
        /// Package name from the recipe book.
        package: String,
        /// Use the checks of a specific published version (default: latest).
        #[arg(long)]
        version: Option<String>,
        /// Look for the install under this prefix instead of the configured
        /// destinations.
        #[arg(long)]
        prefix: Option<PathBuf>,
    },

    /// List the recipe book: packages, versions, licenses.
    List,

    /// Compute SHA-256 of a file (e.g. to pin a new recipe revision).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Generate shell completions for keg itself.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

/// Resolve a recipe by name and optional pinned version.
fn resolve_recipe<'a>(
    book: &'a RecipeBook,
    package: &str,
    version: Option<&str>,
) -> Result<&'a Recipe> {
    match version {
        Some(v) => {
            let v = Version::parse(v).map_err(|e| anyhow!("invalid version {v:?}: {e}"))?;
            book.get(package, &v)
                .ok_or_else(|| anyhow!("no recipe for {package} {v}"))
        }
        None => book
            .latest(package)
            .ok_or_else(|| anyhow!("no recipe named {package:?}")),
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let book = recipe::builtin();

        match cli.command {
            CliCommand::Install {
                package,
                version,
                prefix,
            } => {
                let recipe = resolve_recipe(&book, &package, version.as_deref())?;
                run_install(&cfg, recipe, prefix.as_deref())?;
            }
            CliCommand::Test {
                package,
                version,
                prefix,
            } => {
                let recipe = resolve_recipe(&book, &package, version.as_deref())?;
                run_test(&cfg, recipe, prefix.as_deref())?;
            }
            CliCommand::List => run_list(&book),
            CliCommand::Checksum { path } => run_checksum(&path)?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

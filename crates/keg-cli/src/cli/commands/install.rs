//! `keg install <package>` – run the full pipeline for one recipe.

use super::resolve_root;
use anyhow::Result;
use keg_core::caveat::ConsoleReporter;
use keg_core::config::KegConfig;
use keg_core::fetch::{HttpSource, RetryingSource};
use keg_core::pipeline;
use keg_core::recipe::Recipe;
use keg_core::retry::RetryPolicy;
use std::path::Path;

pub fn run_install(cfg: &KegConfig, recipe: &Recipe, prefix: Option<&Path>) -> Result<()> {
    let root = resolve_root(cfg, prefix)?;

    // Retry is caller policy: transient fetch failures back off and retry,
    // while the pipeline itself stays single-shot.
    let policy = cfg
        .retry
        .as_ref()
        .map(|r| r.policy())
        .unwrap_or_else(RetryPolicy::default);
    let source = RetryingSource::new(HttpSource::default(), policy);

    let mut caveats = ConsoleReporter;
    let success = pipeline::run(recipe, &source, &root, &mut caveats)?;

    println!(
        "Installed {} {} ({} check(s) passed)",
        success.state.package, success.state.version, success.checks_run
    );
    if let Some(bin) = &success.state.binary_path {
        println!("  binary:     {}", bin.display());
    }
    if let Some(comp) = &success.state.completion_path {
        println!("  completion: {}", comp.display());
    }
    Ok(())
}

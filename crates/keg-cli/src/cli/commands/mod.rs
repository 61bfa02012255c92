//! CLI command handlers. Each command is in its own file for clarity.

mod checksum;
mod completions;
mod install;
mod list;

pub use checksum::run_checksum;
pub use completions::run_completions;
pub use install::run_install;
pub use list::run_list;
pub use test::run_test;

use anyhow::Result;
use keg_core::config::KegConfig;
use keg_core::install::InstallRoot;
use std::path::Path;

/// Install root from `--prefix` if given, else from config.
pub(crate) fn resolve_root(cfg: &KegConfig, prefix: Option<&Path>) -> Result<InstallRoot> {
    match prefix {
        Some(p) => Ok(InstallRoot::under(p)),
        None => InstallRoot::from_config(cfg),
    }
}

//! Recipe model: one immutable descriptor per installable package version.
//!
//! A recipe is configuration, not state: it is constructed when a maintainer
//! publishes a version and consumed read-only by the pipeline. A new version
//! is a new recipe, never a mutation of an existing one. Recipes serialize
//! to/from TOML with the same serde setup as the config file.

mod book;
mod builtin;

pub use book::{PublishError, RecipeBook};
pub use builtin::builtin;

use semver::Version;
use serde::{Deserialize, Serialize};

/// Shells a completion script can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    Zsh,
}

/// One file-placement or permission-setting step. Actions run in recipe
/// order; a later action overwrites an earlier one at the same destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstallAction {
    /// Place an archive entry into the bin dir as `name`, mode 0o755.
    PlaceExecutable { source: String, name: String },
    /// Place an archive entry into the shell's completion dir as `name`, mode 0o644.
    PlaceCompletionScript {
        source: String,
        shell: Shell,
        name: String,
    },
    /// Override the permission bits on an already-placed bin entry.
    SetPermission { name: String, mode: u32 },
}

/// One post-install assertion: run the installed binary with `args` and
/// require `expect` to appear in its combined output.
///
/// `expect` is always an explicit literal. It is deliberately not derived
/// from [`Recipe::version`]: some published revisions assert a version
/// string that disagrees with their declared version, and the harness must
/// reproduce that as a finding instead of papering over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Human-readable label used in failure reports.
    pub label: String,
    /// Arguments passed to the installed binary.
    pub args: Vec<String>,
    /// Substring that must appear in the command's stdout or stderr.
    pub expect: String,
}

/// Immutable descriptor of one installable package version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Package identifier, unique per package.
    pub name: String,
    /// Declared version; strictly increasing across revisions of a package.
    pub version: Version,
    /// Project homepage (informational).
    pub homepage: String,
    /// Archive URL template; `{version}` expands to the declared version.
    pub url: String,
    /// Expected SHA-256 of the release archive, lowercase hex.
    pub sha256: String,
    /// License identifier (informational, not enforced).
    pub license: String,
    /// Ordered install steps.
    pub actions: Vec<InstallAction>,
    /// Optional advisory shown once after a successful install.
    #[serde(default)]
    pub caveat: Option<String>,
    /// Post-install self-checks.
    pub checks: Vec<Check>,
}

impl Recipe {
    /// Expand the URL template for this recipe's version.
    pub fn archive_url(&self) -> String {
        self.url.replace("{version}", &self.version.to_string())
    }

    /// Name the primary executable installs under, if the recipe places one.
    pub fn executable_name(&self) -> Option<&str> {
        self.actions.iter().find_map(|a| match a {
            InstallAction::PlaceExecutable { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }
}

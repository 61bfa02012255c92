//! Installer: place verified archive contents into the target root.
//!
//! Actions run in recipe order; placement is last-wins at a destination, so
//! re-running the same recipe converges to the same state (overwrite, not
//! append). Installation is not transactional: a mid-run failure leaves the
//! files written so far, and the caller decides cleanup policy. Each single
//! file placement is atomic (stage to `.part`, then rename into place).

mod place;
mod root;

pub use root::InstallRoot;

use crate::fetch::ArchiveContents;
use crate::recipe::{InstallAction, Recipe, Shell};
use semver::Version;
use std::path::PathBuf;
use thiserror::Error;

/// Modes applied by the two placement actions.
const EXECUTABLE_MODE: u32 = 0o755;
const COMPLETION_MODE: u32 = 0o644;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("archive has no entry {source:?} (wanted for {dest})")]
    MissingSource { r#source: String, dest: PathBuf },
    #[error("no installed executable named {name:?} to set permissions on")]
    MissingTarget { name: String },
    #[error("failed to write {dest}: {err}")]
    Write {
        dest: PathBuf,
        #[source]
        err: std::io::Error,
    },
}

/// What is installed after a successful run: an explicit value handed back
/// to the caller, never ambient global state.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallState {
    pub package: String,
    pub version: Version,
    pub binary_path: Option<PathBuf>,
    pub completion_path: Option<PathBuf>,
}

/// Execute the recipe's install actions against `root` using the verified
/// archive `contents`. Returns the resulting install state.
pub fn install(
    contents: &ArchiveContents,
    recipe: &Recipe,
    root: &InstallRoot,
) -> Result<InstallState, InstallError> {
    let mut state = InstallState {
        package: recipe.name.clone(),
        version: recipe.version.clone(),
        binary_path: None,
        completion_path: None,
    };

    for action in &recipe.actions {
        match action {
            InstallAction::PlaceExecutable { source, name } => {
                let dest = root.bin_dir().join(name);
                let file = contents.get(source).ok_or_else(|| {
                    InstallError::MissingSource {
                        source: source.clone(),
                        dest: dest.clone(),
                    }
                })?;
                place::place_file(&dest, &file.data, EXECUTABLE_MODE)?;
                tracing::info!(dest = %dest.display(), "installed executable");
                state.binary_path = Some(dest);
            }
            InstallAction::PlaceCompletionScript {
                source,
                shell,
                name,
            } => {
                let dir = match shell {
                    Shell::Zsh => root.zsh_completion_dir(),
                };
                let dest = dir.join(name);
                let file = contents.get(source).ok_or_else(|| {
                    InstallError::MissingSource {
                        source: source.clone(),
                        dest: dest.clone(),
                    }
                })?;
                place::place_file(&dest, &file.data, COMPLETION_MODE)?;
                tracing::info!(dest = %dest.display(), "installed completion script");
                state.completion_path = Some(dest);
            }
            InstallAction::SetPermission { name, mode } => {
                let dest = root.bin_dir().join(name);
                if !dest.exists() {
                    return Err(InstallError::MissingTarget { name: name.clone() });
                }
                place::set_mode(&dest, *mode)?;
            }
        }
    }

    Ok(state)
}

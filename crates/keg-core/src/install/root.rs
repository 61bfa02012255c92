//! Install destinations: where executables and completion scripts land.

use crate::config::KegConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Target filesystem root for install actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRoot {
    bin_dir: PathBuf,
    zsh_completion_dir: PathBuf,
}

impl InstallRoot {
    pub fn new(bin_dir: PathBuf, zsh_completion_dir: PathBuf) -> Self {
        Self {
            bin_dir,
            zsh_completion_dir,
        }
    }

    /// Root with the conventional layout under an arbitrary prefix:
    /// `<prefix>/bin` and `<prefix>/share/zsh/site-functions`.
    pub fn under(prefix: &Path) -> Self {
        Self {
            bin_dir: prefix.join("bin"),
            zsh_completion_dir: prefix.join("share/zsh/site-functions"),
        }
    }

    /// Root from user configuration, with per-user defaults
    /// (`~/.local/bin`, `~/.local/share/zsh/site-functions`).
    pub fn from_config(cfg: &KegConfig) -> Result<Self> {
        let bin_dir = match &cfg.bin_dir {
            Some(dir) => dir.clone(),
            None => {
                let home = std::env::var_os("HOME").context("HOME is not set")?;
                Path::new(&home).join(".local/bin")
            }
        };
        let zsh_completion_dir = match &cfg.zsh_completion_dir {
            Some(dir) => dir.clone(),
            None => {
                let xdg_dirs = xdg::BaseDirectories::new()?;
                xdg_dirs.get_data_home().join("zsh/site-functions")
            }
        };
        Ok(Self {
            bin_dir,
            zsh_completion_dir,
        })
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn zsh_completion_dir(&self) -> &Path {
        &self.zsh_completion_dir
    }
}

//! Gzip-compressed tar extraction into memory.
//!
//! Extraction happens only after the digest check has passed, and produces
//! a path-to-bytes mapping for the installer. Entry names from the archive
//! are untrusted input: absolute paths and `..` traversal are rejected.

use flate2::read::GzDecoder;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive read: {0}")]
    Io(#[from] std::io::Error),
    #[error("hostile entry path {path:?}: {reason}")]
    BadEntry { path: String, reason: &'static str },
}

/// One regular file from the archive: contents plus the tar mode bits.
#[derive(Debug, Clone)]
pub struct ArchiveFile {
    pub data: Vec<u8>,
    pub mode: u32,
}

/// Extracted archive contents, keyed by normalized relative path
/// (forward slashes, no leading `./`).
#[derive(Debug, Default)]
pub struct ArchiveContents {
    files: BTreeMap<String, ArchiveFile>,
}

impl ArchiveContents {
    pub fn get(&self, path: &str) -> Option<&ArchiveFile> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

/// Normalize an entry path to a relative forward-slash string, rejecting
/// anything that could escape the install staging area.
fn normalize_entry_path(path: &Path) -> Result<String, ArchiveError> {
    let display = path.display().to_string();
    let mut parts: Vec<&str> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => {
                let name = name.to_str().ok_or(ArchiveError::BadEntry {
                    path: display.clone(),
                    reason: "non-UTF-8 name",
                })?;
                parts.push(name);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(ArchiveError::BadEntry {
                    path: display,
                    reason: "parent-dir traversal",
                })
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::BadEntry {
                    path: display,
                    reason: "absolute path",
                })
            }
        }
    }
    if parts.is_empty() {
        return Err(ArchiveError::BadEntry {
            path: display,
            reason: "empty path",
        });
    }
    Ok(parts.join("/"))
}

/// Unpack a `.tar.gz` buffer. Directories are implied by file paths;
/// non-regular entries (symlinks, devices) are skipped.
pub fn unpack(bytes: &[u8]) -> Result<ArchiveContents, ArchiveError> {
    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    let mut files = BTreeMap::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_type = entry.header().entry_type();
        let path = normalize_entry_path(&entry.path()?)?;

        if !entry_type.is_file() {
            tracing::debug!(path, ?entry_type, "skipping non-regular archive entry");
            continue;
        }

        let mode = entry.header().mode().unwrap_or(0o644) & 0o7777;
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        files.insert(path, ArchiveFile { data, mode });
    }

    Ok(ArchiveContents { files })
}

//! Staged file placement: write to `.part`, set mode, rename into place.
//!
//! The rename makes each placement atomic on its own filesystem, so a
//! re-run never observes a half-written executable.

use super::InstallError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
const TEMP_SUFFIX: &str = ".part";

/// Path for the staging file: appends `.part` to the destination
/// (e.g. `bin/ak` -> `bin/ak.part`).
fn temp_path(dest: &Path) -> PathBuf {
    let mut o = dest.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

fn write_err(dest: &Path, err: std::io::Error) -> InstallError {
    InstallError::Write {
        dest: dest.to_path_buf(),
        err,
    }
}

/// Write `data` to `dest` with the given mode, creating parent directories
/// as needed. Overwrites an existing file (last-wins).
pub(super) fn place_file(dest: &Path, data: &[u8], mode: u32) -> Result<(), InstallError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| write_err(dest, e))?;
    }

    let staging = temp_path(dest);
    let mut f = fs::File::create(&staging).map_err(|e| write_err(dest, e))?;
    f.write_all(data).map_err(|e| write_err(dest, e))?;
    f.sync_all().map_err(|e| write_err(dest, e))?;
    drop(f);

    set_mode(&staging, mode)?;
    fs::rename(&staging, dest).map_err(|e| write_err(dest, e))?;
    Ok(())
}

/// Apply permission bits. No-op off Unix.
pub(super) fn set_mode(path: &Path, mode: u32) -> Result<(), InstallError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|e| write_err(path, e))?;
    }
    #[cfg(not(unix))]
    {
        let _ = (path, mode);
    }
    Ok(())
}

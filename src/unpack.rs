//! Overlay unpack cache
//!
//! Extracting an overlay's backing archive is expensive, so the temp
//! directory from [`crate::workdir`] acts as a cache keyed on modification
//! times: extraction is skipped when the directory already has content and
//! the archive is not newer than it. The check is optimistic and
//! non-transactional; a concurrent write to the archive or the directory
//! between check and extraction is not guarded against.
//!
//! The extraction mechanics themselves are an external capability behind
//! the [`Unpacker`] trait, which also serves as the seam for test doubles.

use std::fs;
use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::overlay::Overlay;

/// Opaque archive-extraction capability.
pub trait Unpacker {
    /// Extract the contents of `archive` into `destination`, populating or
    /// overwriting it.
    fn unpack(&self, archive: &Path, destination: &Path) -> Result<()>;
}

/// Total size in bytes of all regular files under `dir`.
pub fn size_of_directory(dir: &Path) -> u64 {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Ensure the overlay's archive has been extracted into `temp_dir`.
///
/// Skips extraction when the directory already has content and the backing
/// archive is not newer than it. Returns whether extraction actually ran.
pub fn ensure_unpacked(
    unpacker: &dyn Unpacker,
    overlay: &Overlay,
    temp_dir: &Path,
) -> Result<bool> {
    if size_of_directory(temp_dir) != 0 && !archive_newer_than(overlay, temp_dir)? {
        debug!("Overlay [{}] was already unpacked", overlay);
        return Ok(false);
    }

    unpacker
        .unpack(overlay.artifact_file(), temp_dir)
        .map_err(|e| Error::Unpack {
            overlay: overlay.to_string(),
            message: e.to_string(),
        })?;
    Ok(true)
}

fn archive_newer_than(overlay: &Overlay, temp_dir: &Path) -> Result<bool> {
    let archive_mtime = fs::metadata(overlay.artifact_file())?.modified()?;
    let dir_mtime = fs::metadata(temp_dir)?.modified()?;
    Ok(archive_mtime > dir_mtime)
}

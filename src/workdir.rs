//! Overlay temp-directory resolution
//!
//! Each overlay gets a designated unpack/work directory under the build's
//! overlay work root, derived deterministically from its coordinate:
//! `work_root/group-id/artifact-id[-classifier]`. The directory doubles as a
//! build-time cache (see [`crate::unpack`]), so the layout is stable across
//! invocations.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::overlay::Overlay;

/// Resolve (and lazily create) the temp directory for an overlay.
///
/// Safe to call repeatedly; existing directories are left untouched.
pub fn resolve_temp_directory(work_root: &Path, overlay: &Overlay) -> Result<PathBuf> {
    let mut directory_name = overlay.artifact_id().to_string();
    if let Some(classifier) = overlay.classifier() {
        directory_name.push('-');
        directory_name.push_str(classifier);
    }

    let temp_dir = work_root.join(overlay.group_id()).join(directory_name);
    fs::create_dir_all(&temp_dir).map_err(|e| Error::Filesystem {
        message: format!(
            "Failed to create overlay temp directory '{}': {}",
            temp_dir.display(),
            e
        ),
    })?;
    Ok(temp_dir)
}

//! Overlay descriptors
//!
//! An [`Overlay`] is one ranked source of files contributing to the composed
//! output tree: either the primary source tree itself or a
//! dependency-supplied archive. Overlays are produced by dependency
//! resolution upstream of this crate and are immutable once constructed;
//! composition only reads them.
//!
//! Equality is defined by (group, artifact-id) alone. Classifier is folded
//! into temp-directory naming (see [`crate::workdir`]) but not into
//! equality, matching the behavior downstream ordering relies on.

use std::fmt;
use std::path::PathBuf;

/// One ranked overlay source, identified by its dependency coordinate.
#[derive(Debug, Clone)]
pub struct Overlay {
    group_id: String,
    artifact_id: String,
    classifier: Option<String>,
    skip: bool,
    artifact_file: PathBuf,
    target_path: String,
}

impl Overlay {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        classifier: Option<String>,
        artifact_file: impl Into<PathBuf>,
        target_path: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier,
            skip: false,
            artifact_file: artifact_file.into(),
            target_path: target_path.into(),
        }
    }

    /// Mark this overlay as skipped: it will contribute nothing to the
    /// composed output and no unpack or selection work will run for it.
    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn should_skip(&self) -> bool {
        self.skip
    }

    /// The archive file backing this overlay.
    pub fn artifact_file(&self) -> &PathBuf {
        &self.artifact_file
    }

    /// Path prefix under which this overlay's files land in the output tree.
    pub fn target_path(&self) -> &str {
        &self.target_path
    }
}

impl PartialEq for Overlay {
    fn eq(&self, other: &Self) -> bool {
        self.group_id == other.group_id && self.artifact_id == other.artifact_id
    }
}

impl Eq for Overlay {}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

//! Artifact and dependency-graph node descriptors
//!
//! An [`Artifact`] identifies one resolved package file by its dependency
//! coordinate (group, artifact-id, classifier) plus its declared packaging
//! kind. The same logical component may surface in the dependency graph
//! twice, once as a packaged archive and once as its compiled-classes
//! counterpart; the [`crate::refs`] module is responsible for unifying the
//! pair. A [`DependencyNode`] is the opaque handle to the graph node an
//! artifact was resolved from; graph traversal itself happens upstream and
//! is not this crate's concern.

use std::fmt;
use std::path::PathBuf;

/// Declared packaging kind of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A packaged archive (the deployable form of a component).
    Archive,
    /// The compiled-classes counterpart of a packaged component.
    Classes,
}

/// A resolved artifact: coordinate, packaging kind, and backing file.
#[derive(Debug, Clone)]
pub struct Artifact {
    group_id: String,
    artifact_id: String,
    version: String,
    classifier: Option<String>,
    kind: ArtifactKind,
    file: PathBuf,
}

impl Artifact {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        classifier: Option<String>,
        kind: ArtifactKind,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier,
            kind,
            file: file.into(),
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Whether this artifact is the packaged-archive form of its component.
    pub fn is_archive(&self) -> bool {
        self.kind == ArtifactKind::Archive
    }

    /// The resolved file backing this artifact.
    pub fn file(&self) -> &PathBuf {
        &self.file
    }

    /// Whether `other` refers to the same logical component, i.e. the
    /// (group, artifact-id) coordinates match. Version, classifier and
    /// packaging kind are deliberately ignored.
    pub fn same_coordinate(&self, other: &Artifact) -> bool {
        self.group_id == other.group_id && self.artifact_id == other.artifact_id
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// Opaque handle to the dependency-graph node an artifact came from.
///
/// The graph walk that produces these happens outside this crate; references
/// only carry the handle through so callers can correlate a merged reference
/// back to its originating nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    id: String,
}

impl DependencyNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

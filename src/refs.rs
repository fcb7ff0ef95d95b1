//! Dependency references: shallow and deep
//!
//! Dependency resolution walks a graph in which one logical component can
//! appear as two separate nodes: the packaged archive and its
//! compiled-classes counterpart. Downstream overlay ordering needs exactly
//! one reference per logical dependency, so this module models two kinds of
//! reference:
//!
//! - [`ShallowReference`] wraps a single (artifact, node) pair and the
//!   overlay it belongs to.
//! - [`DeepReference`] unifies a classes-typed and an archive-typed artifact
//!   of the *same* coordinate into one reference. Construction validates the
//!   coordinate match and fails otherwise; this is the invariant that keeps
//!   unrelated components from being silently merged just because they met
//!   at the same graph step.
//!
//! References are built once per resolution pass, grow only by child-list
//! appends during that pass, and are read-only afterward.

use crate::artifact::{Artifact, DependencyNode};
use crate::error::{Error, Result};
use crate::overlay::Overlay;

/// A reference to one logical dependency eligible as an overlay source.
#[derive(Debug, Clone)]
pub enum DependencyReference {
    Shallow(ShallowReference),
    Deep(DeepReference),
}

impl DependencyReference {
    /// The overlay this reference's archive-side artifact belongs to.
    pub fn overlay(&self) -> &Overlay {
        match self {
            DependencyReference::Shallow(r) => r.overlay(),
            DependencyReference::Deep(r) => r.overlay(),
        }
    }

    /// Child references, in insertion order. Not deduplicated.
    pub fn children(&self) -> &[DependencyReference] {
        match self {
            DependencyReference::Shallow(r) => r.children(),
            DependencyReference::Deep(r) => r.children(),
        }
    }

    /// Append child references. Append-only; callable repeatedly.
    pub fn add_children(&mut self, children: Vec<DependencyReference>) {
        match self {
            DependencyReference::Shallow(r) => r.add_children(children),
            DependencyReference::Deep(r) => r.add_children(children),
        }
    }

    /// The classes-typed artifact when both halves are known, else the sole
    /// artifact.
    pub fn artifact(&self) -> &Artifact {
        match self {
            DependencyReference::Shallow(r) => r.artifact(),
            DependencyReference::Deep(r) => r.artifact(),
        }
    }

    /// The graph node behind [`Self::artifact`].
    pub fn node(&self) -> &DependencyNode {
        match self {
            DependencyReference::Shallow(r) => r.node(),
            DependencyReference::Deep(r) => r.node(),
        }
    }
}

/// A dependency reference backed by exactly one (artifact, node) pair.
#[derive(Debug, Clone)]
pub struct ShallowReference {
    overlay: Overlay,
    artifact: Artifact,
    node: DependencyNode,
    children: Vec<DependencyReference>,
}

impl ShallowReference {
    pub fn new(overlay: Overlay, artifact: Artifact, node: DependencyNode) -> Self {
        Self {
            overlay,
            artifact,
            node,
            children: Vec::new(),
        }
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn children(&self) -> &[DependencyReference] {
        &self.children
    }

    /// Whether the wrapped artifact is the packaged-archive form.
    pub fn is_archive(&self) -> bool {
        self.artifact.is_archive()
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn node(&self) -> &DependencyNode {
        &self.node
    }

    pub fn add(&mut self, child: DependencyReference) {
        self.children.push(child);
    }

    pub fn add_children(&mut self, children: Vec<DependencyReference>) {
        self.children.extend(children);
    }
}

impl PartialEq for ShallowReference {
    fn eq(&self, other: &Self) -> bool {
        self.artifact.same_coordinate(&other.artifact)
    }
}

impl Eq for ShallowReference {}

/// A dependency reference unifying the classes-typed and archive-typed
/// artifacts of one component.
#[derive(Debug, Clone)]
pub struct DeepReference {
    overlay: Overlay,
    children: Vec<DependencyReference>,
    classes_artifact: Artifact,
    archive_artifact: Artifact,
    classes_node: DependencyNode,
    archive_node: DependencyNode,
}

impl DeepReference {
    /// Merge a newly resolved (artifact, node) pair with the existing
    /// shallow reference representing the other half of the same component.
    ///
    /// If `reference` already holds the archive side, the new pair is taken
    /// as the classes side and the overlay identity comes from `reference`.
    /// Otherwise the new pair is the archive side, children are inherited
    /// from `reference`, and the caller-supplied `overlay` wins.
    ///
    /// Fails with [`Error::ArtifactMismatch`] when the two artifacts'
    /// (group, artifact-id) coordinates differ.
    pub fn merge(
        artifact: Artifact,
        node: DependencyNode,
        reference: ShallowReference,
        overlay: Overlay,
    ) -> Result<Self> {
        if !artifact.same_coordinate(reference.artifact()) {
            return Err(Error::ArtifactMismatch {
                left: artifact.to_string(),
                right: reference.artifact().to_string(),
            });
        }

        let ShallowReference {
            overlay: ref_overlay,
            artifact: ref_artifact,
            node: ref_node,
            children: ref_children,
        } = reference;

        if ref_artifact.is_archive() {
            // The archive side carries no dependency edges of its own.
            Ok(Self {
                overlay: ref_overlay,
                children: Vec::new(),
                classes_artifact: artifact,
                classes_node: node,
                archive_artifact: ref_artifact,
                archive_node: ref_node,
            })
        } else {
            Ok(Self {
                overlay,
                children: ref_children,
                classes_artifact: ref_artifact,
                classes_node: ref_node,
                archive_artifact: artifact,
                archive_node: node,
            })
        }
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn children(&self) -> &[DependencyReference] {
        &self.children
    }

    pub fn add_children(&mut self, children: Vec<DependencyReference>) {
        self.children.extend(children);
    }

    /// The classes-typed artifact.
    pub fn artifact(&self) -> &Artifact {
        &self.classes_artifact
    }

    /// The archive-typed artifact.
    pub fn archive_artifact(&self) -> &Artifact {
        &self.archive_artifact
    }

    /// The graph node behind the classes-typed artifact.
    pub fn node(&self) -> &DependencyNode {
        &self.classes_node
    }

    /// The graph node behind the archive-typed artifact.
    pub fn archive_node(&self) -> &DependencyNode {
        &self.archive_node
    }
}

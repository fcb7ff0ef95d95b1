//! # Overlay Composition Library
//!
//! This library assembles a single output directory tree from multiple
//! ranked "overlay" sources: one primary source tree plus zero or more
//! dependency-supplied archives. Each overlay contributes the files matched
//! by its inclusion rules, and same-named contributions are concatenated
//! into one output file in overlay-priority order.
//!
//! ## Quick Example
//!
//! ```
//! use overlay_compose::artifact::{Artifact, ArtifactKind, DependencyNode};
//! use overlay_compose::overlay::Overlay;
//! use overlay_compose::refs::{DeepReference, ShallowReference};
//!
//! // The same component resolved twice: once as a packaged archive,
//! // once as its compiled-classes counterpart.
//! let archive = Artifact::new(
//!     "com.acme", "webapp", "1.0.0", None, ArtifactKind::Archive, "/repo/webapp.bin",
//! );
//! let classes = Artifact::new(
//!     "com.acme", "webapp", "1.0.0", None, ArtifactKind::Classes, "/repo/webapp-classes.bin",
//! );
//!
//! let overlay = Overlay::new("com.acme", "webapp", None, "/repo/webapp.bin", "");
//! let shallow = ShallowReference::new(overlay.clone(), archive, DependencyNode::new("n1"));
//!
//! // Merging unifies the pair into one deep reference.
//! let deep = DeepReference::merge(classes, DependencyNode::new("n2"), shallow, overlay).unwrap();
//! assert_eq!(deep.artifact().kind(), ArtifactKind::Classes);
//! ```
//!
//! ## Core Concepts
//!
//! - **Overlays (`overlay`)**: ranked file sources identified by a
//!   dependency coordinate, each with a skip flag, a backing archive file,
//!   and a target path prefix.
//! - **Dependency References (`refs`)**: the model that collapses the two
//!   graph appearances of one component (archive and classes artifacts)
//!   into a single reference, validating that both halves share a
//!   coordinate.
//! - **Path Sets (`path_set`)**: ordered, deduplicated relative-path
//!   collections with glob-style include/exclude selection.
//! - **Unpack Cache (`workdir`, `unpack`)**: per-overlay temp directories
//!   derived from the coordinate, re-extracted only when the backing
//!   archive is newer than the cached content.
//! - **Packaging Tasks (`packaging`)**: the sequential pipeline of
//!   catenation tasks appending onto a shared accumulator file, finished by
//!   a task that moves the accumulator to its destination.
//!
//! ## Execution Flow
//!
//! The ordered overlay sequence is supplied by dependency resolution,
//! outside this crate. For each overlay a `CatenationTask` runs: skip check,
//! unpack-if-stale, file selection, append. After all overlays targeting a
//! logical output have run, a `FinishTask` moves the accumulator into
//! place. Everything is single-threaded and blocking; append order is the
//! correctness contract, so the pipeline must stay sequential.

pub mod artifact;
pub mod error;
pub mod overlay;
pub mod packaging;
pub mod path_set;
pub mod refs;
pub mod unpack;
pub mod workdir;

pub use error::{Error, Result};

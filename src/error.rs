//! # Error Handling
//!
//! Centralized error handling for `overlay-compose`. A single `thiserror`
//! enum covers all anticipated failure modes, each variant carrying enough
//! context to identify the overlay or coordinate pair that failed.
//!
//! ## Failure modes
//!
//! - Deep-reference construction over mismatched artifact coordinates
//!   (a precondition violation, raised immediately).
//! - I/O failures while unpacking, catenating, or finishing an output file,
//!   wrapped with the responsible overlay's identity.
//! - Generic filesystem and glob-pattern errors.
//!
//! Missing source files are deliberately *not* an error: an overlay is
//! allowed to be partial with respect to the requested include set, so a
//! path that does not exist simply contributes nothing.
//!
//! No error is retried internally; everything propagates to the top-level
//! composition caller via the crate-wide [`Result`] alias.

use thiserror::Error;

/// Main error type for overlay composition operations
#[derive(Error, Debug)]
pub enum Error {
    /// Two artifacts with different (group, artifact-id) coordinates were
    /// presented to deep-reference construction.
    ///
    /// A deep reference only ever unifies two packagings of the *same*
    /// logical component; this is fatal and raised at construction time.
    #[error("Artifacts mismatch {left} != {right}")]
    ArtifactMismatch { left: String, right: String },

    /// An I/O failure occurred while catenating files from an overlay.
    ///
    /// Carries the failing overlay's identity and the underlying cause.
    #[error("Failed to catenate file from overlay [{overlay}]: {source}")]
    Catenation {
        overlay: String,
        source: std::io::Error,
    },

    /// An I/O failure occurred while unpacking an overlay's backing archive.
    #[error("Failed to unpack overlay [{overlay}]: {message}")]
    Unpack { overlay: String, message: String },

    /// Finishing a catenation output failed: the accumulator could not be
    /// moved to its destination. The accumulator is left in place.
    #[error("Finishing the catenation failed: {src} -> {dst}: {source}")]
    Finish {
        src: String,
        dst: String,
        source: std::io::Error,
    },

    /// An error occurred with a filesystem operation.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

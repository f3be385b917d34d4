//! Error taxonomy for the live-cell tree and its boundaries
//!
//! A missing cell is never an error: `search` returns `Option` and `remove`
//! returns `Ok(false)`.

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::Coord;

/// Everything that can go wrong in the library
#[derive(Debug, Error)]
pub enum LifeError {
    /// A coordinate was inserted twice. Callers must `search` first.
    #[error("a live cell already exists at {coord}")]
    DuplicateKey { coord: Coord },

    /// The tree's parent/child links disagree; the tree must not be used further.
    #[error("tree invariant violated at {coord}: {detail}")]
    TreeInvariantViolation { coord: Coord, detail: String },

    /// A persisted cell stream could not be decoded.
    #[error("malformed cell data: {reason}")]
    MalformedPersistedData { reason: String },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {}: {source}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LifeError {
    /// True for errors that mean the tree itself can no longer be trusted
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LifeError::DuplicateKey { .. } | LifeError::TreeInvariantViolation { .. }
        )
    }
}

pub type Result<T, E = LifeError> = std::result::Result<T, E>;

//! Error types for the drivediff mirror verification tool.

use std::path::PathBuf;
use thiserror::Error;

/// Traversal errors surfaced by a single walk.
///
/// At most one per walk: the first error halts that walk and is returned
/// to the consumer after the walk's result stream has been drained.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("Failed to read directory entry: {0}")]
    Traversal(#[from] walkdir::Error),

    #[error("Failed to stat {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Walker thread panicked")]
    WorkerPanicked,
}

/// Errors for diff setup and the CLI surface.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("Target path does not exist: {0:?}")]
    TargetMissing(PathBuf),

    #[error("Target path is not a directory: {0:?}")]
    TargetNotADirectory(PathBuf),

    #[error("No local nor global .driveignore found")]
    NoIgnoreSource,

    #[error("Invalid ignore pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Walk failed: {0}")]
    Walk(#[from] WalkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

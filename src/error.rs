//! Error types shared across the crate

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortieError {
    /// Reading, parsing or writing the user configuration failed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The source directory could not be turned into a clip list
    #[error("Failed to load clips: {0}")]
    LoadError(String),

    /// Moving or deleting a clip failed
    #[error("Failed to process clip: {0}")]
    EffectError(String),

    /// Putting a clip back where it came from failed
    #[error("Failed to undo: {0}")]
    UndoError(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, SortieError>;

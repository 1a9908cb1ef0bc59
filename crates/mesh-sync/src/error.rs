//! Synchronization error types

use thiserror::Error;

use crate::types::DeckSide;

/// Errors returned by the synchronization engine
///
/// None of these are fatal. Callers check the result before relying on a
/// synchronization having taken place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// One or both beat grids have not been created yet
    #[error("Beat grids not initialized")]
    GridsNotInitialized,

    /// BPM must be positive and finite
    #[error("Invalid BPM: {0}")]
    InvalidBpm(f64),

    /// Crossfader curve name not recognized
    #[error("Unknown crossfader curve: {0}")]
    UnknownCurve(String),

    /// Transition length must be at least one beat
    #[error("Invalid transition duration: {0} beats")]
    InvalidTransitionDuration(u32),

    /// An automatic transition is already running
    #[error("Transition already in progress")]
    TransitionInProgress,

    /// Auto-DJ needs a tokio runtime to schedule its polling task
    #[error("No tokio runtime available to schedule Auto-DJ")]
    NoRuntime,

    /// A deck rejected a transport command
    #[error("{deck} transport error: {message}")]
    Deck { deck: DeckSide, message: String },
}

/// Result type for synchronization operations
pub type SyncResult<T> = Result<T, SyncError>;

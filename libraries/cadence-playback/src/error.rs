//! Error types for playback control

use cadence_core::{CadenceError, SongId};
use thiserror::Error;

/// Playback errors
///
/// None of these are fatal: the controller is left in the state it had
/// before the failing call.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The requested song is not in the library
    #[error("Song not found: {0}")]
    SongNotFound(SongId),

    /// Library mutation failed
    #[error(transparent)]
    Library(#[from] CadenceError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

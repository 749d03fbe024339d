//! Cadence Core
//!
//! Platform-agnostic domain types, error handling and formatting helpers
//! shared by every Cadence crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `Playlist` and their identifiers
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//! - **Time Formatting**: `m:ss` display and progress helpers
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{NewSong, Playlist, SongId};
//! use cadence_core::time::format_time;
//!
//! let song = NewSong::new("Midnight Jazz", "The Blue Notes", "/music/jazz.mp3")
//!     .with_duration(184.0);
//! assert!(song.id.is_none());
//!
//! let playlist = Playlist::new("Focus & Study");
//! assert!(playlist.songs.is_empty());
//!
//! assert_eq!(format_time(184.0), "3:04");
//! assert_eq!(SongId::new("song1").as_str(), "song1");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod time;
pub mod types;

// Re-export commonly used types
pub use error::{CadenceError, Result};
pub use types::{
    NewSong, Playlist, PlaylistId, Song, SongId, SongUpdate, PLACEHOLDER_COVER_URL, UNKNOWN_ARTIST,
};

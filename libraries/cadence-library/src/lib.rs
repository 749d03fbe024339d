//! Cadence Library Store
//!
//! Holds the session's songs and playlists and is the only mutation surface
//! for them. Everything lives in memory; a snapshot can be loaded from JSON
//! to seed a session.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::NewSong;
//! use cadence_library::Library;
//!
//! let mut library = Library::new();
//! let id = library
//!     .add_song(NewSong::new("Summer Breeze", "Coastal Waves", "/music/summer.mp3"))
//!     .unwrap();
//!
//! let playlist = library.create_playlist("  Beach  ").unwrap();
//! library.add_to_playlist(&playlist, &id).unwrap();
//!
//! assert_eq!(library.playlist(&playlist).unwrap().name, "Beach");
//! assert!(library.create_playlist("   ").is_err());
//! ```

mod seed;
mod store;

pub use seed::{default_playlists, default_songs};
pub use store::Library;

/// Playlist domain types
use crate::types::{PlaylistId, SongId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playlist
///
/// `songs` is an ordered list of references into the library. The same
/// song may appear more than once, and entries may dangle after the song
/// is removed from the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name (trimmed, never empty)
    pub name: String,

    /// Song references in play order
    #[serde(default)]
    pub songs: Vec<SongId>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(PlaylistId::generate(), name)
    }

    /// Create a playlist with a specific ID (for seed data)
    pub fn with_id(id: PlaylistId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            songs: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Number of entries, dangling ones included
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Check if the playlist has no entries
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Check if the playlist references the song at least once
    pub fn contains(&self, song_id: &SongId) -> bool {
        self.songs.contains(song_id)
    }
}

//! Song and playlist store

use cadence_core::{CadenceError, NewSong, Playlist, PlaylistId, Result, Song, SongId, SongUpdate};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// In-memory library of songs and playlists
///
/// Songs keep their insertion order, which is also the order used when the
/// whole library is the sequencing domain. Playlists reference songs by id
/// and are never updated when a song is removed, so their entries may dangle.
///
/// Deserializing goes through the same checks as `from_json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LibrarySnapshot")]
pub struct Library {
    songs: Vec<Song>,
    playlists: Vec<Playlist>,
}

/// Unchecked library contents as read from a snapshot
#[derive(Deserialize)]
struct LibrarySnapshot {
    #[serde(default)]
    songs: Vec<Song>,

    #[serde(default)]
    playlists: Vec<Playlist>,
}

impl TryFrom<LibrarySnapshot> for Library {
    type Error = CadenceError;

    /// Enforce the store's rules on snapshot contents
    ///
    /// Song and playlist ids must be present and unique, titles and playlist
    /// names non-blank, and durations finite and non-negative. Blank artists
    /// and covers get the usual fallbacks. Dangling playlist entries are kept.
    fn try_from(snapshot: LibrarySnapshot) -> Result<Self> {
        let mut song_ids = HashSet::new();
        let mut songs = snapshot.songs;
        for song in &mut songs {
            if song.id.as_str().trim().is_empty() {
                return Err(CadenceError::invalid_input("song id must not be empty"));
            }
            if !song_ids.insert(song.id.clone()) {
                return Err(CadenceError::duplicate(format!("song id {}", song.id)));
            }
            if song.title.trim().is_empty() {
                return Err(CadenceError::invalid_input(format!(
                    "song {} has an empty title",
                    song.id
                )));
            }
            if !song.duration_secs.is_finite() || song.duration_secs < 0.0 {
                return Err(CadenceError::invalid_input(format!(
                    "song {} has an invalid duration",
                    song.id
                )));
            }
            song.normalize();
        }

        let mut playlist_ids = HashSet::new();
        let mut playlists = snapshot.playlists;
        for playlist in &mut playlists {
            if playlist.id.as_str().trim().is_empty() {
                return Err(CadenceError::invalid_input("playlist id must not be empty"));
            }
            if !playlist_ids.insert(playlist.id.clone()) {
                return Err(CadenceError::duplicate(format!("playlist id {}", playlist.id)));
            }
            let name = playlist.name.trim();
            if name.is_empty() {
                return Err(CadenceError::invalid_input(format!(
                    "playlist {} has an empty name",
                    playlist.id
                )));
            }
            playlist.name = name.to_string();
        }

        Ok(Self { songs, playlists })
    }
}

impl Library {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library with the built-in demo songs and playlists
    pub fn with_defaults() -> Self {
        Self {
            songs: crate::default_songs(),
            playlists: crate::default_playlists(),
        }
    }

    /// Load a library snapshot from JSON
    ///
    /// Snapshots that break the store's rules are rejected with
    /// `Duplicate` or `InvalidInput`.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: LibrarySnapshot = serde_json::from_str(json)?;
        let library = Self::try_from(snapshot)?;
        debug!(
            songs = library.songs.len(),
            playlists = library.playlists.len(),
            "Loaded library snapshot"
        );
        Ok(library)
    }

    // ===== Songs =====

    /// Append a song to the library
    ///
    /// A fresh id is generated when `song.id` is missing or blank. The audio source is
    /// not checked for reachability; a broken source only shows up later as a
    /// playback failure.
    pub fn add_song(&mut self, song: NewSong) -> Result<SongId> {
        let title = song.title.trim();
        if title.is_empty() {
            return Err(CadenceError::invalid_input("song title must not be empty"));
        }

        let id = match song.id.filter(|id| !id.as_str().trim().is_empty()) {
            Some(id) if self.song(&id).is_some() => {
                return Err(CadenceError::duplicate(format!("song id {id}")));
            }
            Some(id) => id,
            None => SongId::generate(),
        };

        let mut added = Song {
            id: id.clone(),
            title: title.to_string(),
            artist: song.artist,
            cover_url: song.cover_url,
            audio_url: song.audio_url,
            duration_secs: song.duration_secs,
            lyrics: song.lyrics,
            added_at: Utc::now(),
        };
        added.normalize();

        info!(song_id = %id, title = %added.title, "Song added to library");
        self.songs.push(added);

        Ok(id)
    }

    /// Apply a partial update to an existing song
    ///
    /// The edited song gets the same normalization as `add_song`.
    pub fn edit_song(&mut self, id: &SongId, update: SongUpdate) -> Result<()> {
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(CadenceError::invalid_input("song title must not be empty"));
            }
        }

        let song = self
            .songs
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| CadenceError::not_found("Song", id.as_str()))?;

        song.apply(update);
        debug!(song_id = %id, "Song edited");
        Ok(())
    }

    /// Remove a song from the library
    ///
    /// Playlist entries pointing at the song are left in place.
    pub fn remove_song(&mut self, id: &SongId) -> Result<Song> {
        let index = self
            .songs
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| CadenceError::not_found("Song", id.as_str()))?;

        info!(song_id = %id, "Song removed from library");
        Ok(self.songs.remove(index))
    }

    /// All songs in insertion order
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Look up a song by id
    pub fn song(&self, id: &SongId) -> Option<&Song> {
        self.songs.iter().find(|s| &s.id == id)
    }

    /// The first `count` songs, as shown in the "Recently Added" grid
    pub fn recently_added(&self, count: usize) -> &[Song] {
        &self.songs[..count.min(self.songs.len())]
    }

    /// Number of songs
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Check if the library has no songs
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    // ===== Playlists =====

    /// Create an empty playlist
    ///
    /// The name is trimmed. A blank name is rejected and nothing is created.
    pub fn create_playlist(&mut self, name: &str) -> Result<PlaylistId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CadenceError::invalid_input("playlist name must not be empty"));
        }

        let playlist = Playlist::new(name);
        let id = playlist.id.clone();
        info!(playlist_id = %id, name, "Playlist created");

        self.playlists.push(playlist);
        Ok(id)
    }

    /// Rename a playlist
    pub fn rename_playlist(&mut self, id: &PlaylistId, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CadenceError::invalid_input("playlist name must not be empty"));
        }

        self.playlist_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Remove a playlist
    pub fn remove_playlist(&mut self, id: &PlaylistId) -> Result<Playlist> {
        let index = self
            .playlists
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| CadenceError::not_found("Playlist", id.as_str()))?;

        info!(playlist_id = %id, "Playlist removed");
        Ok(self.playlists.remove(index))
    }

    /// Append a song reference to a playlist
    ///
    /// The song must exist at the time it is added. Duplicates are allowed.
    pub fn add_to_playlist(&mut self, playlist_id: &PlaylistId, song_id: &SongId) -> Result<()> {
        if self.song(song_id).is_none() {
            return Err(CadenceError::not_found("Song", song_id.as_str()));
        }

        self.playlist_mut(playlist_id)?.songs.push(song_id.clone());
        debug!(playlist_id = %playlist_id, song_id = %song_id, "Song added to playlist");
        Ok(())
    }

    /// Remove the playlist entry at `index`
    pub fn remove_from_playlist(&mut self, playlist_id: &PlaylistId, index: usize) -> Result<SongId> {
        let playlist = self.playlist_mut(playlist_id)?;
        let len = playlist.songs.len();
        if index >= len {
            return Err(CadenceError::IndexOutOfBounds { index, len });
        }

        Ok(playlist.songs.remove(index))
    }

    /// All playlists in creation order
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Look up a playlist by id
    pub fn playlist(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| &p.id == id)
    }

    /// Resolve a playlist's entries to songs
    ///
    /// Entries that no longer resolve are dropped; the order of the rest is
    /// kept. Unknown playlists resolve to nothing.
    pub fn playlist_songs(&self, id: &PlaylistId) -> Vec<&Song> {
        self.playlist(id)
            .map(|playlist| {
                playlist
                    .songs
                    .iter()
                    .filter_map(|song_id| self.song(song_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn playlist_mut(&mut self, id: &PlaylistId) -> Result<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CadenceError::not_found("Playlist", id.as_str()))
    }
}

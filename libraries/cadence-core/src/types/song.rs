/// Song domain types
use crate::types::SongId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cover shown when a song has no artwork
pub const PLACEHOLDER_COVER_URL: &str = "https://placehold.co/400x400/1a1a1a/cccccc?text=No+Image";

/// Artist shown when none could be determined
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A song in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Unique song identifier
    pub id: SongId,

    /// Song title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Artwork URL (placeholder when missing)
    pub cover_url: String,

    /// Source handed to the audio engine
    pub audio_url: String,

    /// Duration in seconds
    pub duration_secs: f64,

    /// Optional lyrics text
    #[serde(default)]
    pub lyrics: Option<String>,

    /// When the song was added to the library
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl Song {
    /// Cover URL, falling back to the placeholder for blank values
    pub fn cover_or_placeholder(&self) -> &str {
        if self.cover_url.trim().is_empty() {
            PLACEHOLDER_COVER_URL
        } else {
            &self.cover_url
        }
    }

    /// Apply the library's field rules in place
    ///
    /// Trims the title and artist, falls back to `UNKNOWN_ARTIST` and the
    /// placeholder cover for blank values, and clamps the duration to a
    /// finite value of at least zero. Title emptiness is left to the caller.
    pub fn normalize(&mut self) {
        let title = self.title.trim();
        if title.len() != self.title.len() {
            self.title = title.to_string();
        }

        self.artist = match self.artist.trim() {
            "" => UNKNOWN_ARTIST.to_string(),
            artist => artist.to_string(),
        };
        if self.cover_url.trim().is_empty() {
            self.cover_url = PLACEHOLDER_COVER_URL.to_string();
        }
        self.duration_secs = if self.duration_secs.is_finite() {
            self.duration_secs.max(0.0)
        } else {
            0.0
        };
    }

    /// Apply a partial update in place, then normalize
    pub fn apply(&mut self, update: SongUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(artist) = update.artist {
            self.artist = artist;
        }
        if let Some(cover_url) = update.cover_url {
            self.cover_url = cover_url;
        }
        if let Some(audio_url) = update.audio_url {
            self.audio_url = audio_url;
        }
        if let Some(duration_secs) = update.duration_secs {
            self.duration_secs = duration_secs;
        }
        if let Some(lyrics) = update.lyrics {
            self.lyrics = lyrics;
        }
        self.normalize();
    }
}

/// Input for adding a song to the library
///
/// `id` is assigned by the library when left empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewSong {
    pub id: Option<SongId>,
    pub title: String,
    pub artist: String,
    pub cover_url: String,
    pub audio_url: String,
    pub duration_secs: f64,
    pub lyrics: Option<String>,
}

impl NewSong {
    /// Create a new song input with minimal metadata
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            audio_url: audio_url.into(),
            ..Self::default()
        }
    }

    /// Use an explicit id instead of a generated one
    pub fn with_id(mut self, id: impl Into<SongId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the cover URL
    pub fn with_cover(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = cover_url.into();
        self
    }

    /// Set the duration in seconds
    pub fn with_duration(mut self, duration_secs: f64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    /// Set the lyrics
    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = Some(lyrics.into());
        self
    }
}

/// Partial update for an existing song
///
/// `lyrics: Some(None)` clears the lyrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongUpdate {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub cover_url: Option<String>,
    pub audio_url: Option<String>,
    pub duration_secs: Option<f64>,
    pub lyrics: Option<Option<String>>,
}

impl SongUpdate {
    /// Check if the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.cover_url.is_none()
            && self.audio_url.is_none()
            && self.duration_secs.is_none()
            && self.lyrics.is_none()
    }
}

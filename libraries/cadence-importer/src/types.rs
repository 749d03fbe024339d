//! Import data types

use serde::{Deserialize, Serialize};

/// Extension stripped from file names to derive titles
pub const AUDIO_EXTENSION: &str = ".mp3";

/// A raw audio file picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    /// File name as picked, e.g. `"Neon Dreams - Synthwave Memories.mp3"`
    pub name: String,

    /// File contents
    pub bytes: Vec<u8>,
}

impl AudioFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// File name without a trailing `.mp3` (any case)
    pub fn stem(&self) -> &str {
        let name = self.name.as_str();
        let cut = name.len().saturating_sub(AUDIO_EXTENSION.len());
        match name.get(cut..) {
            Some(tail) if tail.eq_ignore_ascii_case(AUDIO_EXTENSION) => &name[..cut],
            _ => name,
        }
    }

    /// Size for display, e.g. `"3.42 MB"`
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.bytes.len() as f64 / (1024.0 * 1024.0))
    }
}

/// A cover image picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub name: String,

    /// MIME type reported by the picker, may be empty
    pub mime: String,

    pub bytes: Vec<u8>,
}

impl CoverImage {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Best-effort metadata read from an audio file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration_secs: Option<f64>,
}

/// Everything the add-song form submits
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRequest {
    pub file: Option<AudioFile>,
    pub title: String,
    pub artist: String,
    pub cover: Option<CoverImage>,
    pub duration_secs: Option<f64>,
}

impl ImportRequest {
    /// Request for a file with every other field left blank
    pub fn for_file(file: AudioFile) -> Self {
        Self {
            file: Some(file),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    pub fn with_cover(mut self, cover: CoverImage) -> Self {
        self.cover = Some(cover);
        self
    }
}

//! Song import orchestration
//!
//! Turns a submitted form into a [`NewSong`]: simulates the upload, fills
//! in fallbacks and hands the song to the library.

use crate::{cover::cover_preview, ImportError, ImportRequest, Result};
use cadence_core::{NewSong, SongId, PLACEHOLDER_COVER_URL, UNKNOWN_ARTIST};
use cadence_library::Library;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Fixed delay of the simulated upload
pub const UPLOAD_DELAY: Duration = Duration::from_millis(1000);

/// Duration used when none was extracted
pub const DEFAULT_DURATION_SECS: f64 = 180.0;

/// Imports submitted songs
#[derive(Debug, Clone)]
pub struct SongImporter {
    upload_delay: Duration,
}

impl SongImporter {
    pub fn new() -> Self {
        Self {
            upload_delay: UPLOAD_DELAY,
        }
    }

    /// Override the simulated upload delay
    pub fn with_upload_delay(upload_delay: Duration) -> Self {
        Self { upload_delay }
    }

    /// Build the song for a submitted form
    ///
    /// Blank title falls back to the file name, blank artist to
    /// "Unknown Artist", a missing cover to the placeholder.
    pub async fn import(&self, request: ImportRequest) -> Result<NewSong> {
        let file = request.file.ok_or(ImportError::MissingFile)?;

        // Simulated upload
        tokio::time::sleep(self.upload_delay).await;

        let title = non_blank(&request.title).unwrap_or_else(|| file.stem().to_string());
        let artist = non_blank(&request.artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        let cover_url = request
            .cover
            .as_ref()
            .map_or_else(|| PLACEHOLDER_COVER_URL.to_string(), cover_preview);
        let duration_secs = request
            .duration_secs
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .unwrap_or(DEFAULT_DURATION_SECS);

        let audio_url = object_url();
        info!(file = %file.name, %title, %artist, %audio_url, "Imported song");

        Ok(NewSong::new(title, artist, audio_url)
            .with_cover(cover_url)
            .with_duration(duration_secs))
    }

    /// Import and add to the library, returning the new id
    pub async fn import_into(&self, library: &mut Library, request: ImportRequest) -> Result<SongId> {
        let song = self.import(request).await?;
        Ok(library.add_song(song)?)
    }
}

impl Default for SongImporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Stand-in for a browser object URL
fn object_url() -> String {
    format!("blob:cadence/{}", Uuid::new_v4())
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

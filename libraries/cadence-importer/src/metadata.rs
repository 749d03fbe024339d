//! Metadata extraction
//!
//! Real tag parsing is out of scope. [`FilenameExtractor`] derives metadata
//! from the file name after a fixed delay, standing in for a tag reader.

use crate::{AudioFile, ExtractedMetadata, ImportError, Result};
use async_trait::async_trait;
use cadence_core::UNKNOWN_ARTIST;
use rand::Rng;
use std::ops::Range;
use std::time::Duration;

/// Fixed delay of the simulated extraction
pub const EXTRACTION_DELAY: Duration = Duration::from_millis(500);

/// Durations (whole seconds) the simulated extraction picks from
pub const SIMULATED_DURATION_SECS: Range<u32> = 60..360;

/// Reads best-effort metadata from an audio file
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract(&self, file: &AudioFile) -> Result<ExtractedMetadata>;
}

/// Simulated extractor working from `"Artist - Title.mp3"` file names
#[derive(Debug, Clone)]
pub struct FilenameExtractor {
    delay: Duration,
}

impl FilenameExtractor {
    pub fn new() -> Self {
        Self {
            delay: EXTRACTION_DELAY,
        }
    }

    /// Override the simulated delay
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FilenameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataExtractor for FilenameExtractor {
    async fn extract(&self, file: &AudioFile) -> Result<ExtractedMetadata> {
        tokio::time::sleep(self.delay).await;

        let mut metadata = parse_file_name(file.stem())?;
        let duration = rand::thread_rng().gen_range(SIMULATED_DURATION_SECS);
        metadata.duration_secs = Some(f64::from(duration));

        tracing::debug!(
            file = %file.name,
            title = ?metadata.title,
            artist = ?metadata.artist,
            "Extracted metadata"
        );
        Ok(metadata)
    }
}

/// Split `"Artist - Title"` into its parts
///
/// Without a separator the whole stem is the title and the artist is
/// unknown. Only the first separator splits, so titles may contain `" - "`.
pub fn parse_file_name(stem: &str) -> Result<ExtractedMetadata> {
    let stem = stem.trim();
    if stem.is_empty() {
        return Err(ImportError::Metadata(
            "file name has no usable text".to_string(),
        ));
    }

    let (artist, title) = match stem.split_once(" - ") {
        Some((artist, title)) if !artist.trim().is_empty() && !title.trim().is_empty() => {
            (artist.trim(), title.trim())
        }
        _ => (UNKNOWN_ARTIST, stem),
    };

    Ok(ExtractedMetadata {
        title: Some(title.to_string()),
        artist: Some(artist.to_string()),
        duration_secs: None,
    })
}

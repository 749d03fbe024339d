//! Add-song form model
//!
//! Tracks the picked file, the user's edits and in-flight metadata
//! extraction. Every picked file gets a new generation; extraction results
//! for an older generation are discarded.

use crate::{
    cover::cover_preview, AudioFile, CoverImage, ExtractedMetadata, ImportError,
    ImportRequest, MetadataExtractor, Result,
};
use tracing::{debug, warn};

/// Identifies the file an extraction was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionTicket(u64);

/// State of the add-song form
#[derive(Debug, Clone, Default)]
pub struct ImportForm {
    file: Option<AudioFile>,
    title: String,
    artist: String,
    cover: Option<CoverImage>,
    cover_preview: Option<String>,
    duration_secs: Option<f64>,
    generation: u64,
    extracting: bool,
}

impl ImportForm {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== File selection =====

    /// Pick an audio file, superseding any extraction in flight
    pub fn select_file(&mut self, file: AudioFile) -> ExtractionTicket {
        self.generation += 1;
        self.file = Some(file);
        self.duration_secs = None;
        self.extracting = true;
        ExtractionTicket(self.generation)
    }

    /// Apply an extraction result
    ///
    /// Returns `false` when the ticket belongs to a superseded file. Extracted
    /// values only fill fields the user left blank. A failed extraction is
    /// logged and leaves the fields as they are.
    pub fn apply_metadata(
        &mut self,
        ticket: ExtractionTicket,
        result: Result<ExtractedMetadata>,
    ) -> bool {
        if ticket.0 != self.generation {
            debug!(ticket = ticket.0, current = self.generation, "Discarding stale metadata");
            return false;
        }
        self.extracting = false;

        match result {
            Ok(metadata) => {
                fill_blank(&mut self.title, metadata.title);
                fill_blank(&mut self.artist, metadata.artist);
                if metadata.duration_secs.is_some() {
                    self.duration_secs = metadata.duration_secs;
                }
            }
            Err(error) => {
                warn!(%error, "Metadata extraction failed, keeping form fields");
            }
        }
        true
    }

    /// Pick a file and run extraction for it
    pub async fn load_file<X>(&mut self, extractor: &X, file: AudioFile) -> bool
    where
        X: MetadataExtractor + ?Sized,
    {
        let ticket = self.select_file(file.clone());
        let result = extractor.extract(&file).await;
        self.apply_metadata(ticket, result)
    }

    // ===== Fields =====

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_artist(&mut self, artist: impl Into<String>) {
        self.artist = artist.into();
    }

    /// Pick a cover image and build its preview
    pub fn set_cover(&mut self, cover: CoverImage) {
        self.cover_preview = Some(cover_preview(&cover));
        self.cover = Some(cover);
    }

    pub fn file(&self) -> Option<&AudioFile> {
        self.file.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn cover_preview(&self) -> Option<&str> {
        self.cover_preview.as_deref()
    }

    pub fn is_extracting(&self) -> bool {
        self.extracting
    }

    /// A file is picked and no extraction is pending
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.extracting
    }

    // ===== Submission =====

    /// Take the submitted request and reset the form
    ///
    /// Without a file nothing is submitted and the form is left as is.
    pub fn submit(&mut self) -> Result<ImportRequest> {
        if self.file.is_none() {
            return Err(ImportError::MissingFile);
        }
        let form = std::mem::take(self);
        self.generation = form.generation + 1;

        Ok(ImportRequest {
            file: form.file,
            title: form.title,
            artist: form.artist,
            cover: form.cover,
            duration_secs: form.duration_secs,
        })
    }

    /// Clear every field, discarding any extraction in flight
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }
}

fn fill_blank(field: &mut String, value: Option<String>) {
    if !field.trim().is_empty() {
        return;
    }
    if let Some(value) = value.filter(|value| !value.trim().is_empty()) {
        *field = value;
    }
}

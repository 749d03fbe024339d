//! Cadence Song Importer
//!
//! This crate turns a user-picked audio file into a song in the Cadence
//! library. Uploads and tag parsing are simulated.
//!
//! # Features
//!
//! - Add-song form state with stale extraction results discarded
//! - Metadata derived from `"Artist - Title.mp3"` file names
//! - Cover image previews as `data:` URLs
//! - Fallbacks for blank title, artist, cover and duration
//!
//! # Architecture
//!
//! - `form`: Form fields, picked files and extraction tickets
//! - `metadata`: Simulated metadata extraction
//! - `cover`: Cover image previews
//! - `importer`: Orchestration of the import into the library

mod error;
mod types;

pub mod cover;
pub mod form;
pub mod importer;
pub mod metadata;

pub use error::ImportError;
pub use form::{ExtractionTicket, ImportForm};
pub use importer::{SongImporter, DEFAULT_DURATION_SECS, UPLOAD_DELAY};
pub use metadata::{parse_file_name, FilenameExtractor, MetadataExtractor, EXTRACTION_DELAY};
pub use types::*;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ImportError>;

//! Error types for the importer

use cadence_core::CadenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No audio file selected")]
    MissingFile,

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Library error: {0}")]
    Library(#[from] CadenceError),
}

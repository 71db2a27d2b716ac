//! FILENAME: report-engine/src/error.rs
//! Error types for spec loading/validation and for the streaming writer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpecError {
    #[error("failed to read report spec file {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse report spec JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("report spec validation failed: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("failed to encode report row: {0}")]
    Encode(String),
    #[error("object store sink error: {0}")]
    Sink(String),
    #[error("io error writing report output: {0}")]
    Io(#[from] std::io::Error),
}

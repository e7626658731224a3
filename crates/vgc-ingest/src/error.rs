//! Error types for raw table ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a raw table.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Failed to read the header record.
    #[error("failed to read CSV header {path}: {source}")]
    Header {
        path: PathBuf,
        #[source]
        source: ::csv::Error,
    },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file is empty.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// Header row has an empty or duplicated column name.
    #[error("invalid header in {path}: {reason}")]
    InvalidHeader { path: PathBuf, reason: String },

    // === Load Errors ===
    /// A table failed to load in build mode.
    #[error("failed to load {dataset} table: {source}")]
    Table {
        dataset: String,
        #[source]
        source: Box<IngestError>,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

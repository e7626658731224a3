//! Error types for artifact output and reading.

use std::path::PathBuf;

use thiserror::Error;
use vgc_ingest::IngestError;

#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to create the output directory.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an artifact.
    #[error("failed to write artifact {artifact} to {path}: {source}")]
    Write {
        artifact: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a persisted artifact back.
    #[error("failed to read artifact {artifact}: {source}")]
    Read {
        artifact: String,
        #[source]
        source: IngestError,
    },

    /// Failed JSON encoding or decoding.
    #[error("JSON error for {artifact}: {source}")]
    Json {
        artifact: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for OutputError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl From<vgc_transform::TransformError> for OutputError {
    fn from(err: vgc_transform::TransformError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;

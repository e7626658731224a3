//! Error types for the transformation stages.

use thiserror::Error;

/// Errors raised while cleaning, merging or segmenting tables.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column the stage depends on is absent.
    #[error("{table} table is missing required column {column}")]
    MissingColumn { table: String, column: String },

    /// A registry has several rows for one key under the reject policy.
    #[error("{registry} registry has {count} duplicated keys (first: {key:?})")]
    DuplicateKeys {
        registry: String,
        key: String,
        count: usize,
    },

    /// A suffixed joined column would overwrite an existing column.
    #[error("{stage} join would produce duplicate column {column}")]
    ColumnCollision { stage: String, column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl TransformError {
    pub(crate) fn missing(table: &str, column: &str) -> Self {
        Self::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_keys_message_names_registry_and_key() {
        let err = TransformError::DuplicateKeys {
            registry: "publishers".to_string(),
            key: "Sega".to_string(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "publishers registry has 2 duplicated keys (first: \"Sega\")"
        );
    }
}

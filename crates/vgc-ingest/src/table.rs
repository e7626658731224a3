//! Named tables flowing between pipeline stages.

use std::path::PathBuf;

use polars::prelude::DataFrame;

use vgc_model::DatasetKind;

/// A loaded frame together with the dataset it came from.
#[derive(Debug, Clone)]
pub struct NamedTable {
    pub dataset: DatasetKind,
    pub data: DataFrame,
    /// File the frame was read from.
    pub source: PathBuf,
}

impl NamedTable {
    pub fn new(dataset: DatasetKind, data: DataFrame, source: impl Into<PathBuf>) -> Self {
        Self {
            dataset,
            data,
            source: source.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.dataset.as_str()
    }

    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    pub fn column_count(&self) -> usize {
        self.data.width()
    }
}

//! Loading the raw source tables under a load mode.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, info_span, warn};

use vgc_model::{DatasetKind, LoadMode};

use crate::csv::read_csv_table;
use crate::error::{IngestError, Result};
use crate::table::NamedTable;

/// A dataset and the file it should be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    pub dataset: DatasetKind,
    pub path: PathBuf,
}

impl TableSource {
    pub fn new(dataset: DatasetKind, path: impl Into<PathBuf>) -> Self {
        Self {
            dataset,
            path: path.into(),
        }
    }
}

/// The five standard sources under a data directory.
pub fn default_sources(data_dir: &Path) -> Vec<TableSource> {
    DatasetKind::ALL
        .into_iter()
        .map(|dataset| TableSource::new(dataset, data_dir.join(dataset.default_file_name())))
        .collect()
}

/// A table that could not be loaded in discovery mode.
#[derive(Debug)]
pub struct LoadFailure {
    pub dataset: DatasetKind,
    pub path: PathBuf,
    pub error: IngestError,
}

/// Tables that loaded, and the ones that did not.
#[derive(Debug, Default)]
pub struct LoadedTables {
    pub tables: BTreeMap<DatasetKind, NamedTable>,
    pub failures: Vec<LoadFailure>,
}

impl LoadedTables {
    pub fn get(&self, dataset: DatasetKind) -> Option<&NamedTable> {
        self.tables.get(&dataset)
    }

    pub fn contains(&self, dataset: DatasetKind) -> bool {
        self.tables.contains_key(&dataset)
    }

    /// The chart table, required by every build.
    pub fn charts(&self) -> Result<&NamedTable> {
        self.get(DatasetKind::Charts).ok_or_else(|| IngestError::Table {
            dataset: DatasetKind::Charts.to_string(),
            source: Box::new(IngestError::FileNotFound {
                path: PathBuf::from(DatasetKind::Charts.default_file_name()),
            }),
        })
    }

    pub fn loaded_count(&self) -> usize {
        self.tables.len()
    }
}

/// Load every source.
///
/// In [`LoadMode::Build`] the first failing table aborts the load. In
/// [`LoadMode::Discovery`] failures are logged, collected, and skipped.
pub fn load_tables(sources: &[TableSource], mode: LoadMode) -> Result<LoadedTables> {
    let span = info_span!("load_tables", mode = ?mode, sources = sources.len());
    let _guard = span.enter();

    let mut loaded = LoadedTables::default();
    for source in sources {
        let start = Instant::now();
        match read_csv_table(&source.path) {
            Ok(data) => {
                debug!(
                    dataset = %source.dataset,
                    path = %source.path.display(),
                    rows = data.height(),
                    columns = data.width(),
                    duration_ms = start.elapsed().as_millis(),
                    "table loaded"
                );
                loaded.tables.insert(
                    source.dataset,
                    NamedTable::new(source.dataset, data, source.path.clone()),
                );
            }
            Err(error) if mode.is_fatal() => {
                return Err(IngestError::Table {
                    dataset: source.dataset.to_string(),
                    source: Box::new(error),
                });
            }
            Err(error) => {
                warn!(
                    dataset = %source.dataset,
                    path = %source.path.display(),
                    error = %error,
                    "table failed to load, skipping"
                );
                loaded.failures.push(LoadFailure {
                    dataset: source.dataset,
                    path: source.path.clone(),
                    error,
                });
            }
        }
    }

    info!(
        loaded = loaded.loaded_count(),
        failed = loaded.failures.len(),
        "raw tables loaded"
    );
    Ok(loaded)
}

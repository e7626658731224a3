//! CSV and JSON artifact writing.

use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use vgc_model::SegmentKind;
use vgc_standards::sha256_hex;
use vgc_transform::{RegistryTables, SegmentedViews};

use crate::error::{OutputError, Result};

pub const CLEANED_CHARTS_FILE: &str = "charts_clean.csv";
pub const MERGED_CHARTS_FILE: &str = "charts_merged.csv";
pub const SUMMARY_FILE: &str = "summary_stats.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// What an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    CleanedCharts,
    MergedCharts,
    View,
    Registry,
    Summary,
}

/// An artifact written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    /// File name relative to the output directory.
    pub name: String,
    pub path: PathBuf,
    pub kind: ArtifactKind,
    /// Data rows, None for JSON documents.
    pub rows: Option<usize>,
    pub sha256: String,
}

/// Frames produced by one run, borrowed for persistence.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactSet<'a> {
    pub cleaned: &'a DataFrame,
    pub merged: &'a DataFrame,
    pub views: &'a SegmentedViews,
    pub registries: &'a RegistryTables,
}

/// Registry artifact file name, e.g. `developers_clean.csv`.
pub fn registry_file_name(name: &str) -> String {
    format!("{name}_clean.csv")
}

/// Create the output directory if it does not exist.
pub fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|source| OutputError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })
}

fn write_bytes(output_dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = output_dir.join(name);
    fs::write(&path, bytes).map_err(|source| OutputError::Write {
        artifact: name.to_string(),
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Write a frame as CSV with a header row.
pub fn write_csv(
    output_dir: &Path,
    name: &str,
    kind: ArtifactKind,
    df: &DataFrame,
) -> Result<WrittenArtifact> {
    let mut buffer = Vec::new();
    let mut frame = df.clone();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut frame)?;
    let path = write_bytes(output_dir, name, &buffer)?;
    debug!(artifact = name, rows = df.height(), "csv artifact written");
    Ok(WrittenArtifact {
        name: name.to_string(),
        path,
        kind,
        rows: Some(df.height()),
        sha256: sha256_hex(&buffer),
    })
}

/// Write a serializable value as pretty JSON.
pub fn write_json<T: Serialize>(
    output_dir: &Path,
    name: &str,
    kind: ArtifactKind,
    value: &T,
) -> Result<WrittenArtifact> {
    let mut buffer = serde_json::to_vec_pretty(value).map_err(|source| OutputError::Json {
        artifact: name.to_string(),
        source,
    })?;
    buffer.push(b'\n');
    let path = write_bytes(output_dir, name, &buffer)?;
    Ok(WrittenArtifact {
        name: name.to_string(),
        path,
        kind,
        rows: None,
        sha256: sha256_hex(&buffer),
    })
}

/// Write the cleaned and merged tables, every view, and every registry.
pub fn persist_artifacts(output_dir: &Path, set: ArtifactSet<'_>) -> Result<Vec<WrittenArtifact>> {
    let span = info_span!("persist_artifacts", output_dir = %output_dir.display());
    let _guard = span.enter();

    ensure_output_dir(output_dir)?;
    let mut written = vec![
        write_csv(
            output_dir,
            CLEANED_CHARTS_FILE,
            ArtifactKind::CleanedCharts,
            set.cleaned,
        )?,
        write_csv(
            output_dir,
            MERGED_CHARTS_FILE,
            ArtifactKind::MergedCharts,
            set.merged,
        )?,
    ];

    for kind in SegmentKind::ALL {
        if let Some(view) = set.views.get(kind) {
            written.push(write_csv(
                output_dir,
                &kind.file_name(),
                ArtifactKind::View,
                view,
            )?);
        }
    }

    for (dataset, df) in set.registries.iter() {
        written.push(write_csv(
            output_dir,
            &registry_file_name(dataset.as_str()),
            ArtifactKind::Registry,
            df,
        )?);
    }

    info!(artifacts = written.len(), "artifacts persisted");
    Ok(written)
}

//! Summary statistics for a pipeline run.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::Utc;
use polars::prelude::DataFrame;

use vgc_model::schema::{GENRE, PLATFORM, PUBLISHER, YEAR};
use vgc_model::{DuplicateKeyPolicy, SummaryStats, YearRange};
use vgc_transform::data_utils::{has_column, numeric_column_i64, string_column};
use vgc_transform::{CleanedCharts, MergedCharts, SegmentedViews};

use crate::error::Result;
use crate::writer::{ArtifactKind, SUMMARY_FILE, WrittenArtifact, write_json};

/// In-memory results the summary is computed from.
#[derive(Debug, Clone, Copy)]
pub struct SummaryInputs<'a> {
    pub raw: &'a DataFrame,
    pub cleaned: &'a CleanedCharts,
    pub merged: &'a MergedCharts,
    pub views: &'a SegmentedViews,
    pub duplicate_keys: DuplicateKeyPolicy,
    pub lookups_sha256: &'a str,
}

fn distinct_count(df: &DataFrame, column: &str) -> Result<usize> {
    if !has_column(df, column) {
        return Ok(0);
    }
    let values: BTreeSet<String> = string_column(df, column)?
        .into_iter()
        .filter(|value| !value.is_empty())
        .collect();
    Ok(values.len())
}

/// Minimum and maximum of the derived year, None when no row has one.
pub fn year_range(df: &DataFrame) -> Result<Option<YearRange>> {
    if !has_column(df, YEAR) {
        return Ok(None);
    }
    let years: Vec<i64> = numeric_column_i64(df, YEAR)?.into_iter().flatten().collect();
    let (Some(min), Some(max)) = (years.iter().min(), years.iter().max()) else {
        return Ok(None);
    };
    Ok(Some(YearRange {
        min: i32::try_from(*min).unwrap_or(i32::MIN),
        max: i32::try_from(*max).unwrap_or(i32::MAX),
    }))
}

/// Compute the summary record. Distinct counts come from the cleaned table.
pub fn compute_summary(inputs: SummaryInputs<'_>) -> Result<SummaryStats> {
    let cleaned = &inputs.cleaned.data;
    let merged = &inputs.merged.data;
    Ok(SummaryStats {
        generated_at: Utc::now().to_rfc3339(),
        original_row_count: inputs.raw.height(),
        original_column_count: inputs.raw.width(),
        cleaned_row_count: cleaned.height(),
        cleaned_column_count: cleaned.width(),
        merged_row_count: merged.height(),
        merged_column_count: merged.width(),
        view_counts: inputs.views.counts(),
        year_range: year_range(cleaned)?,
        platforms_count: distinct_count(cleaned, PLATFORM)?,
        genres_count: distinct_count(cleaned, GENRE)?,
        publishers_count: distinct_count(cleaned, PUBLISHER)?,
        duplicate_key_policy: inputs.duplicate_keys,
        joins: inputs.merged.joins.clone(),
        cleaning: inputs.cleaned.report.clone(),
        lookups_sha256: inputs.lookups_sha256.to_string(),
    })
}

/// Write `summary_stats.json`.
pub fn write_summary(output_dir: &Path, stats: &SummaryStats) -> Result<WrittenArtifact> {
    write_json(output_dir, SUMMARY_FILE, ArtifactKind::Summary, stats)
}

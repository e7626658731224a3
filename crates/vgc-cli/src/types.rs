use std::path::PathBuf;

use polars::prelude::DataFrame;

use vgc_ingest::TableProfile;
use vgc_model::{DatasetKind, SummaryStats};
use vgc_output::{DashboardFilter, DashboardView, KeyMetrics, WrittenArtifact};

/// Outcome of `vgc build`.
#[derive(Debug)]
pub struct BuildResult {
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub lookups_origin: String,
    pub stats: SummaryStats,
    /// Empty for a dry run.
    pub artifacts: Vec<WrittenArtifact>,
}

/// Outcome of `vgc explore`.
#[derive(Debug)]
pub struct ExploreResult {
    pub data_dir: PathBuf,
    pub profiles: Vec<TableProfile>,
    /// Tables that failed to load, with the reason.
    pub failures: Vec<(DatasetKind, String)>,
    /// Best-selling raw chart rows, when the chart table loaded.
    pub top_games: Option<DataFrame>,
}

/// Outcome of `vgc view`.
#[derive(Debug)]
pub struct ViewResult {
    pub output_dir: PathBuf,
    pub view: DashboardView,
    pub filter: DashboardFilter,
    pub metrics: KeyMetrics,
    pub top_games: DataFrame,
    /// Platform codes the filter accepts.
    pub platforms: Vec<String>,
    /// Genres the filter accepts.
    pub genres: Vec<String>,
}

//! Build pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Lookups**: Load and validate the lookup tables
//! 2. **Load**: Read every raw table (build mode, first failure aborts)
//! 3. **Registries**: Normalize developer and publisher registries
//! 4. **Clean**: Clean chart records and derive attributes
//! 5. **Merge**: Left-join charts with the registries
//! 6. **Segment**: Build the named views
//! 7. **Summary**: Compute summary statistics
//! 8. **Persist**: Write CSV artifacts, summary and manifest
//!
//! Each stage takes the output of the previous stage and returns typed
//! results. Failures carry a `"<stage> stage failed"` context.

use std::fmt;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use vgc_ingest::{LoadedTables, TableSource, default_sources, load_tables};
use vgc_model::{ProcessingOptions, SummaryStats};
use vgc_output::{
    ArtifactManifest, ArtifactSet, SummaryInputs, WrittenArtifact, compute_summary,
    persist_artifacts, write_manifest, write_summary,
};
use vgc_standards::{LookupTables, load_default_lookups, load_lookups};
use vgc_transform::{
    CleanedCharts, MergedCharts, RegistryTables, SegmentedViews, clean_charts, merge_tables,
    normalize_registries, segment,
};

/// Pipeline stage identifiers, used for spans, progress and error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lookups,
    Load,
    Registries,
    Clean,
    Merge,
    Segment,
    Summary,
    Persist,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Lookups,
        Stage::Load,
        Stage::Registries,
        Stage::Clean,
        Stage::Merge,
        Stage::Segment,
        Stage::Summary,
        Stage::Persist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Lookups => "lookups",
            Stage::Load => "load",
            Stage::Registries => "registries",
            Stage::Clean => "clean",
            Stage::Merge => "merge",
            Stage::Segment => "segment",
            Stage::Summary => "summary",
            Stage::Persist => "persist",
        }
    }

    fn failed(self) -> String {
        format!("{self} stage failed")
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs of one build run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Explicit lookup file; defaults to `VGC_STANDARDS_DIR` or the embedded tables.
    pub lookups_path: Option<PathBuf>,
    pub options: ProcessingOptions,
    /// Run every stage except persistence.
    pub dry_run: bool,
    /// Show a progress bar on stderr.
    pub show_progress: bool,
}

impl PipelineConfig {
    pub fn new(data_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_dir: output_dir.into(),
            lookups_path: None,
            options: ProcessingOptions::default(),
            dry_run: false,
            show_progress: false,
        }
    }
}

/// Everything a build run produced.
#[derive(Debug)]
pub struct PipelineOutput {
    pub lookups: LookupTables,
    pub cleaned: CleanedCharts,
    pub merged: MergedCharts,
    pub views: SegmentedViews,
    pub stats: SummaryStats,
    pub artifacts: Vec<WrittenArtifact>,
}

/// Progress reporting for the build stages.
struct StageProgress {
    bar: ProgressBar,
}

impl StageProgress {
    fn new(visible: bool) -> Self {
        let bar = if visible && io::stderr().is_terminal() {
            let bar = ProgressBar::new(Stage::ALL.len() as u64);
            let style = ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            bar.set_style(style);
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar }
    }

    fn start(&self, stage: Stage) {
        self.bar.set_message(stage.as_str());
    }

    fn finish(&self) {
        self.bar.inc(1);
    }

    fn done(&self) {
        self.bar.finish_and_clear();
    }
}

// ============================================================================
// Stages
// ============================================================================

/// Load lookup tables from an explicit path or the default location.
pub fn load_lookup_tables(path: Option<&Path>) -> Result<LookupTables> {
    let span = info_span!("stage", name = Stage::Lookups.as_str());
    let _guard = span.enter();
    let tables = match path {
        Some(path) => load_lookups(path),
        None => load_default_lookups(),
    }
    .with_context(|| Stage::Lookups.failed())?;
    info!(
        origin = %tables.origin,
        sha256 = %tables.sha256,
        platforms = tables.platform_generations.len(),
        "lookup tables loaded"
    );
    Ok(tables)
}

pub fn load_stage(sources: &[TableSource], options: &ProcessingOptions) -> Result<LoadedTables> {
    let span = info_span!("stage", name = Stage::Load.as_str());
    let _guard = span.enter();
    let start = Instant::now();
    let loaded = load_tables(sources, options.load_mode).with_context(|| Stage::Load.failed())?;
    info!(
        tables = loaded.loaded_count(),
        duration_ms = start.elapsed().as_millis(),
        "load complete"
    );
    Ok(loaded)
}

pub fn registries_stage(loaded: &LoadedTables) -> Result<RegistryTables> {
    let span = info_span!("stage", name = Stage::Registries.as_str());
    let _guard = span.enter();
    normalize_registries(loaded).with_context(|| Stage::Registries.failed())
}

pub fn clean_stage(raw: &DataFrame, lookups: &LookupTables) -> Result<CleanedCharts> {
    let span = info_span!("stage", name = Stage::Clean.as_str());
    let _guard = span.enter();
    clean_charts(raw, lookups).with_context(|| Stage::Clean.failed())
}

pub fn merge_stage(
    cleaned: &DataFrame,
    registries: &RegistryTables,
    options: &ProcessingOptions,
) -> Result<MergedCharts> {
    let span = info_span!("stage", name = Stage::Merge.as_str());
    let _guard = span.enter();
    merge_tables(cleaned, registries, options.duplicate_keys)
        .with_context(|| Stage::Merge.failed())
}

pub fn segment_stage(merged: &DataFrame, lookups: &LookupTables) -> Result<SegmentedViews> {
    let span = info_span!("stage", name = Stage::Segment.as_str());
    let _guard = span.enter();
    let views = segment(merged, lookups).with_context(|| Stage::Segment.failed())?;
    for (kind, df) in views.iter() {
        info!(view = %kind, rows = df.height(), "view ready");
    }
    Ok(views)
}

/// Write every artifact, then the summary, then the manifest.
pub fn persist_stage(
    output_dir: &Path,
    set: ArtifactSet<'_>,
    stats: &SummaryStats,
) -> Result<Vec<WrittenArtifact>> {
    let span = info_span!("stage", name = Stage::Persist.as_str());
    let _guard = span.enter();
    let start = Instant::now();

    let mut artifacts = persist_artifacts(output_dir, set).with_context(|| Stage::Persist.failed())?;
    artifacts.push(write_summary(output_dir, stats).with_context(|| Stage::Persist.failed())?);
    let manifest = ArtifactManifest::new(&stats.generated_at, &stats.lookups_sha256, &artifacts);
    write_manifest(output_dir, &manifest).with_context(|| Stage::Persist.failed())?;

    info!(
        output_dir = %output_dir.display(),
        artifacts = artifacts.len(),
        duration_ms = start.elapsed().as_millis(),
        "persist complete"
    );
    Ok(artifacts)
}

// ============================================================================
// Orchestration
// ============================================================================

/// Run the full build pipeline.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutput> {
    let span = info_span!(
        "build",
        data_dir = %config.data_dir.display(),
        dry_run = config.dry_run
    );
    let _guard = span.enter();
    let start = Instant::now();
    let progress = StageProgress::new(config.show_progress);

    progress.start(Stage::Lookups);
    let lookups = load_lookup_tables(config.lookups_path.as_deref())?;
    progress.finish();

    progress.start(Stage::Load);
    let loaded = load_stage(&default_sources(&config.data_dir), &config.options)?;
    let charts = loaded.charts().with_context(|| Stage::Load.failed())?;
    progress.finish();

    progress.start(Stage::Registries);
    let registries = registries_stage(&loaded)?;
    progress.finish();

    progress.start(Stage::Clean);
    let cleaned = clean_stage(&charts.data, &lookups)?;
    progress.finish();

    progress.start(Stage::Merge);
    let merged = merge_stage(&cleaned.data, &registries, &config.options)?;
    progress.finish();

    progress.start(Stage::Segment);
    let views = segment_stage(&merged.data, &lookups)?;
    progress.finish();

    progress.start(Stage::Summary);
    let stats = compute_summary(SummaryInputs {
        raw: &charts.data,
        cleaned: &cleaned,
        merged: &merged,
        views: &views,
        duplicate_keys: config.options.duplicate_keys,
        lookups_sha256: &lookups.sha256,
    })
    .with_context(|| Stage::Summary.failed())?;
    progress.finish();

    progress.start(Stage::Persist);
    let artifacts = if config.dry_run {
        debug!("dry run, nothing written");
        Vec::new()
    } else {
        persist_stage(
            &config.output_dir,
            ArtifactSet {
                cleaned: &cleaned.data,
                merged: &merged.data,
                views: &views,
                registries: &registries,
            },
            &stats,
        )?
    };
    progress.finish();
    progress.done();

    info!(
        rows = stats.merged_row_count,
        artifacts = artifacts.len(),
        duration_ms = start.elapsed().as_millis(),
        "build complete"
    );
    Ok(PipelineOutput {
        lookups,
        cleaned,
        merged,
        views,
        stats,
        artifacts,
    })
}

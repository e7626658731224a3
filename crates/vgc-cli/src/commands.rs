use anyhow::{Context, Result};
use tracing::info;

use vgc_cli::pipeline::{PipelineConfig, load_lookup_tables, run_pipeline};
use vgc_cli::types::{BuildResult, ExploreResult, ViewResult};
use vgc_ingest::{default_sources, load_tables, profile_table};
use vgc_model::{DatasetKind, LoadMode, ProcessingOptions};
use vgc_output::{DashboardContext, DashboardFilter, KeyMetrics, top_games};
use vgc_standards::LookupTables;

use crate::cli::{BuildArgs, ExploreArgs, LookupsArgs, ViewArgs};

pub fn run_build(args: &BuildArgs, show_progress: bool) -> Result<BuildResult> {
    let config = PipelineConfig {
        data_dir: args.data_dir.clone(),
        output_dir: args.output_dir.clone(),
        lookups_path: args.lookups.clone(),
        options: ProcessingOptions::new()
            .with_load_mode(LoadMode::Build)
            .with_duplicate_keys(args.duplicate_keys.into()),
        dry_run: args.dry_run,
        show_progress,
    };
    let output = run_pipeline(&config)?;
    Ok(BuildResult {
        output_dir: config.output_dir,
        dry_run: config.dry_run,
        lookups_origin: output.lookups.origin,
        stats: output.stats,
        artifacts: output.artifacts,
    })
}

pub fn run_explore(args: &ExploreArgs) -> Result<ExploreResult> {
    let sources = default_sources(&args.data_dir);
    let loaded = load_tables(&sources, LoadMode::Discovery).context("load stage failed")?;

    let mut profiles = Vec::with_capacity(loaded.loaded_count());
    for table in loaded.tables.values() {
        profiles.push(
            profile_table(table)
                .with_context(|| format!("profile {} table", table.name()))?,
        );
    }
    let failures = loaded
        .failures
        .iter()
        .map(|failure| (failure.dataset, failure.error.to_string()))
        .collect();
    let top = match loaded.get(DatasetKind::Charts) {
        Some(charts) => Some(top_games(&charts.data, args.top).context("rank chart rows")?),
        None => None,
    };

    info!(
        loaded = loaded.loaded_count(),
        failed = loaded.failures.len(),
        "exploration complete"
    );
    Ok(ExploreResult {
        data_dir: args.data_dir.clone(),
        profiles,
        failures,
        top_games: top,
    })
}

pub fn run_view(args: &ViewArgs) -> Result<ViewResult> {
    let context = DashboardContext::load(&args.output_dir).context("load dashboard artifacts")?;
    let year_range = match (args.year_from, args.year_to) {
        (None, None) => None,
        (from, to) => {
            let bounds = context.year_bounds()?;
            let lower = from.or(bounds.map(|(min, _)| min)).unwrap_or(i32::MIN);
            let upper = to.or(bounds.map(|(_, max)| max)).unwrap_or(i32::MAX);
            Some((lower, upper))
        }
    };
    let filter = DashboardFilter {
        platform: args.platform.clone(),
        genre: args.genre.clone(),
        year_range,
    };
    let view = args.view.into();
    let rows = context.filtered(view, &filter)?;
    let metrics = KeyMetrics::compute(&rows)?;
    let top = top_games(&rows, args.top)?;
    Ok(ViewResult {
        output_dir: context.output_dir().to_path_buf(),
        view,
        filter,
        metrics,
        top_games: top,
        platforms: context.platforms()?,
        genres: context.genres()?,
    })
}

pub fn run_lookups(args: &LookupsArgs) -> Result<LookupTables> {
    load_lookup_tables(args.lookups.as_deref())
}

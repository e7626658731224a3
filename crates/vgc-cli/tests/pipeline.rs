//! End-to-end tests for the build pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use vgc_cli::pipeline::{PipelineConfig, Stage, run_pipeline};
use vgc_model::{DuplicateKeyPolicy, ProcessingOptions, SegmentKind};
use vgc_output::{MANIFEST_FILE, SUMMARY_FILE, read_manifest};

const CHARTS: &str = "\
title,console,genre,publisher,developer,release_date,na_sales,jp_sales,pal_sales,other_sales,total_sales,critic_score
Halo,XBOX,Shooter,Microsoft,Bungie,2001-11-15,4.98,0.14,1.3,0.07,6.49,9.7
Wii Sports,Wii,Sports,Nintendo,Nintendo EAD,2006-11-19,41.49,3.77,29.02,8.46,82.74,7.7
Zelda,NS,Action,Nintendo,Nintendo EPD,2017-03-03,4.38,1.35,3.13,0.69,,9.8
Mystery,PS4,nan,Tiny Press,,not a date,,,,,,
";

const DEVELOPERS: &str = "\
developer,city,country
Bungie,Bellevue,USA
Nintendo EAD,Kyoto,Japan
";

const PUBLISHERS: &str = "\
Publisher,city,country
Microsoft,Redmond,USA
Nintendo,Kyoto,Japan
";

const GEO_CITIES: &str = "\
City,Country
Kyoto,Japan
";

const GEO_COUNTRIES: &str = "\
Country,Region
Japan,Asia
USA,North America
";

fn write_data_dir(dir: &Path) -> PathBuf {
    let data = dir.join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("vg_charts.csv"), CHARTS).unwrap();
    fs::write(data.join("vg_developers.csv"), DEVELOPERS).unwrap();
    fs::write(data.join("vg_publishers.csv"), PUBLISHERS).unwrap();
    fs::write(data.join("vg_geo_cities.csv"), GEO_CITIES).unwrap();
    fs::write(data.join("vg_geo_countries.csv"), GEO_COUNTRIES).unwrap();
    data
}

fn config(dir: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::new(write_data_dir(dir), dir.join("processed_data"));
    config.lookups_path =
        Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("../../standards/lookups.toml"));
    config
}

#[test]
fn build_writes_every_artifact_and_manifest() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());

    let output = run_pipeline(&config).unwrap();

    let names: Vec<&str> = output
        .artifacts
        .iter()
        .map(|artifact| artifact.name.as_str())
        .collect();
    insta::assert_debug_snapshot!(names, @r#"
    [
        "charts_clean.csv",
        "charts_merged.csv",
        "complete_sales.csv",
        "recent_games.csv",
        "major_publishers.csv",
        "top_platforms.csv",
        "developers_clean.csv",
        "publishers_clean.csv",
        "geo_cities_clean.csv",
        "geo_countries_clean.csv",
        "summary_stats.json",
    ]
    "#);
    for artifact in &output.artifacts {
        assert!(artifact.path.is_file(), "{} missing", artifact.name);
    }

    let manifest = read_manifest(&config.output_dir).unwrap();
    assert_eq!(manifest.files.len(), output.artifacts.len());
    assert_eq!(manifest.lookups_sha256, output.lookups.sha256);
    let merged = manifest.file("charts_merged.csv").unwrap();
    assert_eq!(merged.rows, Some(4));

    let stats = &output.stats;
    assert_eq!(stats.original_row_count, 4);
    assert_eq!(stats.merged_row_count, 4);
    assert_eq!(stats.duplicate_key_policy, DuplicateKeyPolicy::FirstMatch);
    assert_eq!(stats.cleaning.unparsed_dates, 1);
    assert_eq!(
        stats.cleaning.renamed_columns.get("platform").map(String::as_str),
        Some("console")
    );
    assert_eq!(stats.view_count(SegmentKind::CompleteSales), 3);
    assert_eq!(stats.view_count(SegmentKind::RecentGames), 1);
    assert_eq!(stats.view_count(SegmentKind::MajorPublishers), 3);
    assert_eq!(stats.view_count(SegmentKind::TopPlatforms), 2);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut config = config(dir.path());
    config.dry_run = true;

    let output = run_pipeline(&config).unwrap();

    assert!(output.artifacts.is_empty());
    assert_eq!(output.stats.merged_row_count, 4);
    assert!(!config.output_dir.join(SUMMARY_FILE).exists());
    assert!(!config.output_dir.join(MANIFEST_FILE).exists());
}

#[test]
fn missing_chart_table_fails_load_stage() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    fs::remove_file(config.data_dir.join("vg_charts.csv")).unwrap();

    let error = run_pipeline(&config).unwrap_err();

    let message = format!("{error:#}");
    assert!(message.starts_with("load stage failed"), "{message}");
    assert!(message.contains("charts"), "{message}");
    assert!(!config.output_dir.exists());
}

#[test]
fn missing_registry_aborts_build() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    fs::remove_file(config.data_dir.join("vg_publishers.csv")).unwrap();

    let error = run_pipeline(&config).unwrap_err();

    let message = format!("{error:#}");
    assert!(message.contains("publishers"), "{message}");
    assert!(!config.output_dir.exists());
}

#[test]
fn rejected_duplicate_keys_fail_merge_stage() {
    let dir = TempDir::new().unwrap();
    let mut config = config(dir.path());
    fs::write(
        config.data_dir.join("vg_developers.csv"),
        "developer,city,country\nBungie,Bellevue,USA\nBungie,Chicago,USA\n",
    )
    .unwrap();
    config.options = ProcessingOptions::new().with_duplicate_keys(DuplicateKeyPolicy::Reject);

    let error = run_pipeline(&config).unwrap_err();

    let message = format!("{error:#}");
    assert!(message.starts_with("merge stage failed"), "{message}");
    assert!(message.contains("Bungie"), "{message}");
}

#[test]
fn fan_out_adds_rows_for_duplicate_keys() {
    let dir = TempDir::new().unwrap();
    let mut config = config(dir.path());
    fs::write(
        config.data_dir.join("vg_developers.csv"),
        "developer,city,country\nBungie,Bellevue,USA\nBungie,Chicago,USA\n",
    )
    .unwrap();
    config.options = ProcessingOptions::new().with_duplicate_keys(DuplicateKeyPolicy::FanOut);
    config.dry_run = true;

    let output = run_pipeline(&config).unwrap();

    assert_eq!(output.stats.merged_row_count, 5);
    let developers = &output.stats.joins[0];
    assert_eq!(developers.stage, "developers");
    assert_eq!(developers.added_rows, 1);
}

#[test]
fn blocked_artifact_fails_persist_stage_naming_it() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    fs::create_dir_all(config.output_dir.join("charts_merged.csv")).unwrap();

    let error = run_pipeline(&config).unwrap_err();

    let message = format!("{error:#}");
    assert!(message.starts_with("persist stage failed"), "{message}");
    assert!(
        message.contains("failed to write artifact charts_merged.csv"),
        "{message}"
    );
    assert!(!config.output_dir.join(MANIFEST_FILE).exists());
}

#[test]
fn output_dir_that_is_a_file_fails_persist_stage() {
    let dir = TempDir::new().unwrap();
    let mut config = config(dir.path());
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, "occupied").unwrap();
    config.output_dir = blocker.clone();

    let error = run_pipeline(&config).unwrap_err();

    let message = format!("{error:#}");
    assert!(message.starts_with("persist stage failed"), "{message}");
    assert!(
        message.contains(&format!("failed to create output directory {}", blocker.display())),
        "{message}"
    );
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "occupied");
}

#[test]
fn stage_names_are_stable() {
    let names: Vec<&str> = Stage::ALL.iter().map(|stage| stage.as_str()).collect();
    assert_eq!(
        names,
        [
            "lookups",
            "load",
            "registries",
            "clean",
            "merge",
            "segment",
            "summary",
            "persist"
        ]
    );
}

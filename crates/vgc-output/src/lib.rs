//! Artifact output for the chart preprocessing pipeline.
//!
//! Writes the cleaned, merged, segmented and registry tables as CSV, the
//! summary and manifest as JSON, and reads the artifacts back for dashboard
//! queries.

pub mod dashboard;
pub mod error;
pub mod manifest;
pub mod summary;
pub mod writer;

pub use dashboard::{DashboardContext, DashboardFilter, DashboardView, KeyMetrics, top_games};
pub use error::{OutputError, Result};
pub use manifest::{ArtifactManifest, ManifestFile, read_manifest, write_manifest};
pub use summary::{SummaryInputs, compute_summary, write_summary, year_range};
pub use writer::{
    ArtifactKind, ArtifactSet, CLEANED_CHARTS_FILE, MANIFEST_FILE, MERGED_CHARTS_FILE,
    SUMMARY_FILE, WrittenArtifact, ensure_output_dir, persist_artifacts, registry_file_name,
};

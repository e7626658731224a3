//! Run reports and the persisted summary-statistics record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::options::DuplicateKeyPolicy;
use crate::segment::SegmentKind;

/// Counters collected while cleaning the chart table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Rows whose release date could not be parsed.
    pub unparsed_dates: usize,
    /// Rows missing at least one regional figure before zero-fill.
    pub incomplete_sales_rows: usize,
    /// Zero-filled values per sales column.
    pub filled_sales: BTreeMap<String, usize>,
    /// Critic scores replaced with zero.
    pub filled_critic_scores: usize,
    /// Text values replaced with the "Unknown" sentinel, per column.
    pub unknown_text: BTreeMap<String, usize>,
    /// Platform codes absent from the generation table.
    pub unmapped_platforms: usize,
    /// Raw column renamed to its canonical name, keyed by canonical name.
    pub renamed_columns: BTreeMap<String, String>,
}

/// Outcome of one left-join stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStageReport {
    /// Join identifier ("developers", "publishers", "geo_countries").
    pub stage: String,
    /// Left-hand key column.
    pub left_key: String,
    /// Right-hand key column.
    pub right_key: String,
    /// Left rows with at least one registry match.
    pub matched_rows: usize,
    /// Left rows retained with null joined attributes.
    pub unmatched_rows: usize,
    /// Registry keys that occur more than once.
    pub duplicate_keys: usize,
    /// Rows added by fan-out (zero unless the policy is fan-out).
    pub added_rows: usize,
    /// Set when the stage was skipped because the registry was absent.
    pub skipped: bool,
}

impl JoinStageReport {
    pub fn skipped(stage: impl Into<String>, left_key: &str, right_key: &str) -> Self {
        Self {
            stage: stage.into(),
            left_key: left_key.to_string(),
            right_key: right_key.to_string(),
            matched_rows: 0,
            unmatched_rows: 0,
            duplicate_keys: 0,
            added_rows: 0,
            skipped: true,
        }
    }
}

/// Minimum and maximum derived release year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

/// Summary-statistics record written next to the artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub generated_at: String,
    pub original_row_count: usize,
    pub original_column_count: usize,
    pub cleaned_row_count: usize,
    pub cleaned_column_count: usize,
    pub merged_row_count: usize,
    pub merged_column_count: usize,
    /// Row count per segmented view.
    pub view_counts: BTreeMap<SegmentKind, usize>,
    /// None when no row has a parseable release date.
    pub year_range: Option<YearRange>,
    pub platforms_count: usize,
    pub genres_count: usize,
    pub publishers_count: usize,
    pub duplicate_key_policy: DuplicateKeyPolicy,
    pub joins: Vec<JoinStageReport>,
    pub cleaning: CleaningReport,
    /// SHA-256 of the lookup tables used for the run.
    pub lookups_sha256: String,
}

impl SummaryStats {
    pub fn view_count(&self, kind: SegmentKind) -> usize {
        self.view_counts.get(&kind).copied().unwrap_or(0)
    }
}

//! Left-outer joins of chart rows with the registries.
//!
//! Three stages run in order: developer registry on `developer`, publisher
//! registry on `publisher`, geography-by-country on `country_pub`. Every
//! right-hand column is suffixed with its join identifier (`_dev`, `_pub`,
//! `_geo`). The right key of the first two stages equals the left key and is
//! dropped. The geography key is kept in its normalized form.

use std::collections::HashMap;
use std::time::Instant;

use polars::prelude::*;
use tracing::{info, info_span, warn};

use vgc_model::schema::{
    DEVELOPER, DEVELOPER_SUFFIX, GEO_COUNTRY, GEO_SUFFIX, PUBLISHER, PUBLISHER_SUFFIX,
    find_column, publisher_country,
};
use vgc_model::{DatasetKind, DuplicateKeyPolicy, JoinStageReport};

use crate::data_utils::{has_column, optional_string_column, strip_all_quotes};
use crate::error::{Result, TransformError};
use crate::registry::RegistryTables;

/// Merged chart frame plus one report per join stage.
#[derive(Debug, Clone)]
pub struct MergedCharts {
    pub data: DataFrame,
    pub joins: Vec<JoinStageReport>,
}

/// How a key cell is prepared before matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyNormalization {
    Trim,
    /// Trim and strip single and double quotes.
    StripQuotes,
}

impl KeyNormalization {
    fn apply(self, value: &str) -> Option<String> {
        let normalized = match self {
            KeyNormalization::Trim => value.trim().to_string(),
            KeyNormalization::StripQuotes => strip_all_quotes(value),
        };
        (!normalized.is_empty()).then_some(normalized)
    }
}

/// One join stage of the merge contract.
#[derive(Debug, Clone)]
struct JoinSpec {
    registry: DatasetKind,
    left_key: String,
    right_key: String,
    suffix: &'static str,
    keep_right_key: bool,
    normalization: KeyNormalization,
}

/// Join the cleaned chart table with every available registry.
///
/// A stage whose registry is absent is skipped and reported as such. The
/// geography stage also needs the publisher stage to have run.
pub fn merge_tables(
    charts: &DataFrame,
    registries: &RegistryTables,
    policy: DuplicateKeyPolicy,
) -> Result<MergedCharts> {
    let span = info_span!("merge_tables", rows = charts.height(), policy = %policy);
    let _guard = span.enter();
    let start = Instant::now();

    let mut data = charts.clone();
    let mut joins = Vec::with_capacity(3);

    let entity_stages = [
        (DatasetKind::Developers, DEVELOPER, DEVELOPER_SUFFIX, &registries.developers),
        (DatasetKind::Publishers, PUBLISHER, PUBLISHER_SUFFIX, &registries.publishers),
    ];
    for (registry, key, suffix, table) in entity_stages {
        let Some(right) = table else {
            warn!(registry = %registry, "registry absent, join skipped");
            joins.push(JoinStageReport::skipped(registry.as_str(), key, key));
            continue;
        };
        let spec = JoinSpec {
            registry,
            left_key: key.to_string(),
            right_key: key.to_string(),
            suffix,
            keep_right_key: false,
            normalization: KeyNormalization::Trim,
        };
        let (joined, report) = left_join(&data, right, &spec, policy)?;
        data = joined;
        joins.push(report);
    }

    let geo_left = publisher_country();
    match &registries.geo_countries {
        Some(right) if has_column(&data, &geo_left) => {
            let names: Vec<String> = right
                .get_column_names()
                .iter()
                .map(|name| name.to_string())
                .collect();
            let right_key = find_column(names.iter().map(String::as_str), GEO_COUNTRY)
                .ok_or_else(|| {
                    TransformError::missing(DatasetKind::GeoCountries.as_str(), GEO_COUNTRY)
                })?;
            let spec = JoinSpec {
                registry: DatasetKind::GeoCountries,
                left_key: geo_left,
                right_key,
                suffix: GEO_SUFFIX,
                keep_right_key: true,
                normalization: KeyNormalization::StripQuotes,
            };
            let (joined, report) = left_join(&data, right, &spec, policy)?;
            data = joined;
            joins.push(report);
        }
        _ => {
            warn!(
                registry = %DatasetKind::GeoCountries,
                "geography join skipped"
            );
            joins.push(JoinStageReport::skipped(
                DatasetKind::GeoCountries.as_str(),
                &geo_left,
                GEO_COUNTRY,
            ));
        }
    }

    info!(
        rows = data.height(),
        columns = data.width(),
        stages = joins.iter().filter(|j| !j.skipped).count(),
        duration_ms = start.elapsed().as_millis(),
        "tables merged"
    );
    Ok(MergedCharts { data, joins })
}

/// Registry row indices per normalized key, in registry order.
fn index_keys(keys: &[Option<String>]) -> (HashMap<&str, Vec<usize>>, Vec<&str>) {
    let mut index: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut duplicated = Vec::new();
    for (row, key) in keys.iter().enumerate() {
        let Some(key) = key.as_deref() else {
            continue;
        };
        let rows = index.entry(key).or_default();
        rows.push(row);
        if rows.len() == 2 {
            duplicated.push(key);
        }
    }
    (index, duplicated)
}

fn left_join(
    left: &DataFrame,
    right: &DataFrame,
    spec: &JoinSpec,
    policy: DuplicateKeyPolicy,
) -> Result<(DataFrame, JoinStageReport)> {
    let stage = spec.registry.as_str();
    if !has_column(left, &spec.left_key) {
        return Err(TransformError::missing("merged charts", &spec.left_key));
    }
    if !has_column(right, &spec.right_key) {
        return Err(TransformError::missing(stage, &spec.right_key));
    }

    let normalize = |values: Vec<Option<String>>| -> Vec<Option<String>> {
        values
            .into_iter()
            .map(|value| value.and_then(|v| spec.normalization.apply(&v)))
            .collect()
    };
    let left_keys = normalize(optional_string_column(left, &spec.left_key)?);
    let right_keys = normalize(optional_string_column(right, &spec.right_key)?);

    let (index, duplicated) = index_keys(&right_keys);
    if let Some(first) = duplicated.first() {
        warn!(
            registry = stage,
            duplicate_keys = duplicated.len(),
            first = %first,
            policy = %policy,
            "registry has duplicated join keys"
        );
        if policy == DuplicateKeyPolicy::Reject {
            return Err(TransformError::DuplicateKeys {
                registry: stage.to_string(),
                key: (*first).to_string(),
                count: duplicated.len(),
            });
        }
    }

    let mut left_rows: Vec<IdxSize> = Vec::with_capacity(left.height());
    let mut right_rows: Vec<Option<usize>> = Vec::with_capacity(left.height());
    let mut matched = 0usize;
    let mut added = 0usize;
    for (row, key) in left_keys.iter().enumerate() {
        let hits = key.as_deref().and_then(|k| index.get(k));
        match hits {
            Some(hits) => {
                matched += 1;
                let take = match policy {
                    DuplicateKeyPolicy::FanOut => hits.len(),
                    _ => 1,
                };
                added += take - 1;
                for hit in &hits[..take] {
                    left_rows.push(row as IdxSize);
                    right_rows.push(Some(*hit));
                }
            }
            None => {
                left_rows.push(row as IdxSize);
                right_rows.push(None);
            }
        }
    }

    let mut out = if added == 0 {
        left.clone()
    } else {
        left.take(&IdxCa::from_vec("rows".into(), left_rows))?
    };

    for column in right.get_columns() {
        let name = column.name().as_str();
        let is_key = name == spec.right_key;
        if is_key && !spec.keep_right_key {
            continue;
        }
        let target = format!("{name}{}", spec.suffix);
        if has_column(&out, &target) {
            return Err(TransformError::ColumnCollision {
                stage: stage.to_string(),
                column: target,
            });
        }
        let source: Vec<Option<String>> = if is_key {
            right_keys.clone()
        } else {
            optional_string_column(right, name)?
        };
        let values: Vec<Option<String>> = right_rows
            .iter()
            .map(|row| row.and_then(|r| source[r].clone()))
            .collect();
        out.with_column(Series::new(target.as_str().into(), values))?;
    }

    let report = JoinStageReport {
        stage: stage.to_string(),
        left_key: spec.left_key.clone(),
        right_key: spec.right_key.clone(),
        matched_rows: matched,
        unmatched_rows: left.height() - matched,
        duplicate_keys: duplicated.len(),
        added_rows: added,
        skipped: false,
    };
    info!(
        stage,
        matched = report.matched_rows,
        unmatched = report.unmatched_rows,
        added = report.added_rows,
        "join stage complete"
    );
    Ok((out, report))
}

//! Per-column profiling for the exploration report.

use std::collections::BTreeSet;

use polars::prelude::*;
use serde::Serialize;

use crate::polars_utils::{any_to_string_non_empty, parse_f64};
use crate::table::NamedTable;

/// Statistics for a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Null or blank cells.
    pub missing: usize,
    /// Distinct non-missing values.
    pub distinct: usize,
    /// True when every non-missing value parses as a number.
    pub is_numeric: bool,
    /// Up to five distinct values in first-seen order.
    pub sample_values: Vec<String>,
}

/// Shape and column statistics for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProfile {
    pub name: String,
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
}

impl TableProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|column| column.missing).sum()
    }
}

const SAMPLE_LIMIT: usize = 5;

/// Profile every column of a frame.
pub fn profile_frame(name: &str, df: &DataFrame) -> PolarsResult<TableProfile> {
    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        columns.push(profile_column(column)?);
    }
    Ok(TableProfile {
        name: name.to_string(),
        rows: df.height(),
        columns,
    })
}

/// Profile a loaded table.
pub fn profile_table(table: &NamedTable) -> PolarsResult<TableProfile> {
    profile_frame(table.name(), &table.data)
}

fn profile_column(column: &Column) -> PolarsResult<ColumnProfile> {
    let mut missing = 0usize;
    let mut seen = BTreeSet::new();
    let mut samples = Vec::new();
    let mut is_numeric = true;
    let mut any_present = false;

    for idx in 0..column.len() {
        match any_to_string_non_empty(column.get(idx)?) {
            None => missing += 1,
            Some(value) => {
                any_present = true;
                if is_numeric && parse_f64(&value).is_none() {
                    is_numeric = false;
                }
                if seen.insert(value.clone()) && samples.len() < SAMPLE_LIMIT {
                    samples.push(value);
                }
            }
        }
    }

    Ok(ColumnProfile {
        name: column.name().to_string(),
        missing,
        distinct: seen.len(),
        is_numeric: any_present && is_numeric,
        sample_values: samples,
    })
}

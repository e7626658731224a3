//! Chart record cleaning and attribute derivation.

use std::time::Instant;

use chrono::Datelike;
use polars::prelude::*;
use tracing::{debug, info, info_span};

use vgc_model::CleaningReport;
use vgc_model::schema::{
    self, CALCULATED_TOTAL, CRITIC_SCORE, DECADE, HAS_COMPLETE_SALES, PLATFORM,
    PLATFORM_GENERATION, REGIONAL_SALES, RELEASE_DATE, RELEASE_DATE_CLEAN, REQUIRED_CHART_COLUMNS,
    SALES_COLUMNS, TEXT_COLUMNS, UNKNOWN, YEAR,
};
use vgc_standards::LookupTables;

use crate::data_utils::{
    has_column, numeric_column_f64, optional_string_column, set_bool_column, set_f64_column,
    set_i32_column, set_optional_string_column, set_string_column,
};
use crate::datetime::{decade_for, format_iso_date, parse_release_date};
use crate::error::{Result, TransformError};

const TABLE: &str = "charts";

/// Cleaned chart frame and what cleaning had to repair.
#[derive(Debug, Clone)]
pub struct CleanedCharts {
    pub data: DataFrame,
    pub report: CleaningReport,
}

/// A sales figure is present when it parses as a finite, non-negative number.
pub fn present_sales(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

/// Clean the raw chart table and add the derived columns.
///
/// The completeness flag is taken from the raw regional figures before any
/// zero-fill runs. Columns outside the chart schema pass through untouched.
pub fn clean_charts(raw: &DataFrame, lookups: &LookupTables) -> Result<CleanedCharts> {
    let span = info_span!("clean_charts", rows = raw.height());
    let _guard = span.enter();
    let start = Instant::now();

    let mut report = CleaningReport::default();
    let mut df = raw.clone();
    canonicalize_columns(&mut df, lookups, &mut report)?;

    for column in REQUIRED_CHART_COLUMNS {
        if !has_column(&df, column) {
            return Err(TransformError::missing(TABLE, column));
        }
    }

    let height = df.height();

    // Presence must be read from the raw figures.
    let mut regional = Vec::with_capacity(REGIONAL_SALES.len());
    for column in REGIONAL_SALES {
        let values: Vec<Option<f64>> = numeric_column_f64(&df, column)?
            .into_iter()
            .map(present_sales)
            .collect();
        regional.push(values);
    }
    let complete: Vec<bool> = (0..height)
        .map(|idx| regional.iter().all(|values| values[idx].is_some()))
        .collect();
    report.incomplete_sales_rows = complete.iter().filter(|flag| !**flag).count();

    let mut filled_regional: Vec<Vec<f64>> = Vec::with_capacity(REGIONAL_SALES.len());
    for column in SALES_COLUMNS {
        let values: Vec<Option<f64>> = match REGIONAL_SALES.iter().position(|c| *c == column) {
            Some(pos) => regional[pos].clone(),
            None => numeric_column_f64(&df, column)?
                .into_iter()
                .map(present_sales)
                .collect(),
        };
        let filled = zero_fill(values, column, &mut report);
        if REGIONAL_SALES.contains(&column) {
            filled_regional.push(filled.clone());
        }
        set_f64_column(&mut df, column, filled)?;
    }

    let critic: Vec<Option<f64>> = numeric_column_f64(&df, CRITIC_SCORE)?
        .into_iter()
        .map(|value| value.filter(|v| v.is_finite()))
        .collect();
    report.filled_critic_scores = critic.iter().filter(|v| v.is_none()).count();
    let critic: Vec<f64> = critic.into_iter().map(|v| v.unwrap_or(0.0)).collect();
    set_f64_column(&mut df, CRITIC_SCORE, critic)?;

    for column in TEXT_COLUMNS {
        if !has_column(&df, column) {
            continue;
        }
        let (values, replaced) = normalize_text(optional_string_column(&df, column)?, lookups);
        if replaced > 0 {
            report.unknown_text.insert(column.to_string(), replaced);
        }
        set_string_column(&mut df, column, values)?;
    }

    let mut release_clean = Vec::with_capacity(height);
    let mut years = Vec::with_capacity(height);
    let mut decades = Vec::with_capacity(height);
    for value in optional_string_column(&df, RELEASE_DATE)? {
        let parsed = value
            .as_deref()
            .and_then(|v| parse_release_date(v, &lookups.cleaning));
        match parsed {
            Some(date) => {
                let year = date.year();
                release_clean.push(Some(format_iso_date(date)));
                years.push(Some(year));
                decades.push(Some(decade_for(year)));
            }
            None => {
                report.unparsed_dates += 1;
                release_clean.push(None);
                years.push(None);
                decades.push(None);
            }
        }
    }
    set_optional_string_column(&mut df, RELEASE_DATE_CLEAN, release_clean)?;
    set_i32_column(&mut df, YEAR, years)?;
    set_i32_column(&mut df, DECADE, decades)?;

    let mut generations = Vec::with_capacity(height);
    for platform in optional_string_column(&df, PLATFORM)? {
        let platform = platform.unwrap_or_default();
        if !lookups.has_generation(&platform) {
            report.unmapped_platforms += 1;
        }
        generations.push(lookups.generation_for(&platform).to_string());
    }
    set_string_column(&mut df, PLATFORM_GENERATION, generations)?;

    let totals: Vec<f64> = (0..height)
        .map(|idx| filled_regional.iter().map(|values| values[idx]).sum())
        .collect();
    set_f64_column(&mut df, CALCULATED_TOTAL, totals)?;
    set_bool_column(&mut df, HAS_COMPLETE_SALES, complete)?;

    info!(
        rows = df.height(),
        columns = df.width(),
        unparsed_dates = report.unparsed_dates,
        incomplete_sales = report.incomplete_sales_rows,
        unmapped_platforms = report.unmapped_platforms,
        duration_ms = start.elapsed().as_millis(),
        "charts cleaned"
    );
    Ok(CleanedCharts { data: df, report })
}

/// Rename aliased and case-variant columns to their canonical names.
fn canonicalize_columns(
    df: &mut DataFrame,
    lookups: &LookupTables,
    report: &mut CleaningReport,
) -> Result<()> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    for name in &names {
        let Some(canonical) = lookups.canonical_column(name) else {
            continue;
        };
        if canonical == name.as_str() || has_column(df, canonical) {
            continue;
        }
        debug!(from = %name, to = %canonical, "renaming aliased column");
        df.rename(name, canonical.into())?;
        report
            .renamed_columns
            .insert(canonical.to_string(), name.clone());
    }

    let wanted = REQUIRED_CHART_COLUMNS.iter().chain(TEXT_COLUMNS.iter());
    for canonical in wanted {
        if has_column(df, canonical) {
            continue;
        }
        let current: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        if let Some(found) = schema::find_column(current.iter().map(String::as_str), canonical) {
            debug!(from = %found, to = %canonical, "renaming case-variant column");
            df.rename(&found, (*canonical).into())?;
            report
                .renamed_columns
                .insert(canonical.to_string(), found);
        }
    }
    Ok(())
}

fn zero_fill(values: Vec<Option<f64>>, column: &str, report: &mut CleaningReport) -> Vec<f64> {
    let filled = values.iter().filter(|v| v.is_none()).count();
    if filled > 0 {
        report.filled_sales.insert(column.to_string(), filled);
    }
    values.into_iter().map(|v| v.unwrap_or(0.0)).collect()
}

/// Trim text and replace absent values with the "Unknown" sentinel.
fn normalize_text(values: Vec<Option<String>>, lookups: &LookupTables) -> (Vec<String>, usize) {
    let mut replaced = 0usize;
    let normalized = values
        .into_iter()
        .map(|value| {
            let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
            if trimmed.is_empty() || lookups.is_placeholder(trimmed) {
                replaced += 1;
                UNKNOWN.to_string()
            } else {
                trimmed.to_string()
            }
        })
        .collect();
    (normalized, replaced)
}

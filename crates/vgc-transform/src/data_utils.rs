//! Column access helpers shared by the transformation stages.

use polars::prelude::*;
use vgc_ingest::polars_utils::{any_to_f64, any_to_i64, any_to_string};

use crate::error::Result;

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Raw cell text per row; None for null cells.
pub fn optional_string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx)?;
        if value.is_null() {
            values.push(None);
        } else {
            values.push(Some(any_to_string(value)));
        }
    }
    Ok(values)
}

/// Trimmed cell text per row; empty string for null cells.
pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_string(column.get(idx)?).trim().to_string());
    }
    Ok(values)
}

pub fn numeric_column_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_f64(column.get(idx)?));
    }
    Ok(values)
}

pub fn numeric_column_i64(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_i64(column.get(idx)?));
    }
    Ok(values)
}

/// Boolean cells, accepting the text forms written to CSV.
pub fn bool_column(df: &DataFrame, name: &str) -> Result<Vec<Option<bool>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = match column.get(idx)? {
            AnyValue::Boolean(b) => Some(b),
            AnyValue::Null => None,
            other => match any_to_string(other).trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
        };
        values.push(value);
    }
    Ok(values)
}

pub fn set_string_column(df: &mut DataFrame, name: &str, values: Vec<String>) -> Result<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn set_optional_string_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<String>>,
) -> Result<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn set_f64_column(df: &mut DataFrame, name: &str, values: Vec<f64>) -> Result<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn set_i32_column(df: &mut DataFrame, name: &str, values: Vec<Option<i32>>) -> Result<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn set_bool_column(df: &mut DataFrame, name: &str, values: Vec<bool>) -> Result<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}

/// Strip every single and double quote and surrounding whitespace.
pub fn strip_all_quotes(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|ch| *ch != '"' && *ch != '\'')
        .collect::<String>()
        .trim()
        .to_string()
}

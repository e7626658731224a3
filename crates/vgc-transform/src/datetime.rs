//! Release-date parsing.
//!
//! Source dates are loosely formatted. Each configured chrono format is tried
//! in order; formats with a time component go through `NaiveDateTime` and
//! keep only the date. Year-month (`YYYY-MM`) and bare-year values fall back
//! to the first day of the period. A parsed year outside the plausible range
//! counts as unparseable.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use vgc_standards::CleaningRules;

fn has_time_component(format: &str) -> bool {
    format.contains("%H") || format.contains("%T")
}

fn parse_with_format(value: &str, format: &str) -> Option<NaiveDate> {
    if has_time_component(format) {
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .map(|dt| dt.date())
    } else {
        NaiveDate::parse_from_str(value, format).ok()
    }
}

fn parse_year(value: &str) -> Option<i32> {
    let digits = value.strip_suffix(".0").unwrap_or(value);
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

fn parse_year_month(value: &str) -> Option<NaiveDate> {
    let (year, month) = value.split_once('-')?;
    let year = parse_year(year)?;
    if month.is_empty() || month.len() > 2 || !month.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, 1)
}

/// Parse a raw release date, returning None when no rule applies.
pub fn parse_release_date(value: &str, rules: &CleaningRules) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = rules
        .date_formats
        .iter()
        .find_map(|format| parse_with_format(trimmed, format))
        .or_else(|| parse_year_month(trimmed))
        .or_else(|| parse_year(trimmed).and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)))?;

    (rules.min_year..=rules.max_year)
        .contains(&parsed.year())
        .then_some(parsed)
}

/// Start year of the decade containing `year`.
pub fn decade_for(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// ISO `YYYY-MM-DD` rendering of a parsed date.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

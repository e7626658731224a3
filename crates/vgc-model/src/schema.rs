//! Canonical column names for chart, registry and merged tables.
//!
//! Every stage addresses columns through these constants so the output schema
//! stays stable across the cleaner, merger and persister.

/// Game title.
pub const TITLE: &str = "title";
/// Hardware platform code (e.g. "PS2", "X360").
pub const PLATFORM: &str = "platform";
pub const GENRE: &str = "genre";
pub const PUBLISHER: &str = "publisher";
pub const DEVELOPER: &str = "developer";
/// Loosely formatted release date as supplied by the source.
pub const RELEASE_DATE: &str = "release_date";

pub const NA_SALES: &str = "na_sales";
pub const JP_SALES: &str = "jp_sales";
pub const PAL_SALES: &str = "pal_sales";
pub const OTHER_SALES: &str = "other_sales";
/// Total sales figure supplied by the source, never reconciled.
pub const TOTAL_SALES: &str = "total_sales";
pub const CRITIC_SCORE: &str = "critic_score";

/// Parsed release date in ISO `YYYY-MM-DD` form.
pub const RELEASE_DATE_CLEAN: &str = "release_date_clean";
pub const YEAR: &str = "year";
pub const DECADE: &str = "decade";
pub const PLATFORM_GENERATION: &str = "platform_generation";
/// Sum of the four regional sales figures after zero-fill.
pub const CALCULATED_TOTAL: &str = "calculated_total";
/// True when all four regional figures were present before zero-fill.
pub const HAS_COMPLETE_SALES: &str = "has_complete_sales";

/// Registry columns shared by the developer and publisher tables.
pub const CITY: &str = "city";
pub const COUNTRY: &str = "country";

/// Key column of the geography-by-country table.
pub const GEO_COUNTRY: &str = "Country";

/// The four per-market sales columns, in source order.
pub const REGIONAL_SALES: [&str; 4] = [NA_SALES, JP_SALES, PAL_SALES, OTHER_SALES];

/// Every sales column that receives the zero-fill policy.
pub const SALES_COLUMNS: [&str; 5] = [NA_SALES, JP_SALES, PAL_SALES, OTHER_SALES, TOTAL_SALES];

/// Free-text columns that are trimmed and placeholder-normalized.
pub const TEXT_COLUMNS: [&str; 5] = [TITLE, PLATFORM, GENRE, PUBLISHER, DEVELOPER];

/// Columns the chart cleaner cannot work without.
pub const REQUIRED_CHART_COLUMNS: [&str; 8] = [
    PLATFORM,
    RELEASE_DATE,
    NA_SALES,
    JP_SALES,
    PAL_SALES,
    OTHER_SALES,
    TOTAL_SALES,
    CRITIC_SCORE,
];

/// Sentinel written in place of absent text values.
pub const UNKNOWN: &str = "Unknown";

/// Suffix applied to columns arriving through the developer join.
pub const DEVELOPER_SUFFIX: &str = "_dev";
/// Suffix applied to columns arriving through the publisher join.
pub const PUBLISHER_SUFFIX: &str = "_pub";
/// Suffix applied to columns arriving through the geography join.
pub const GEO_SUFFIX: &str = "_geo";

/// Publisher country after the publisher join, used as the geography key.
pub fn publisher_country() -> String {
    format!("{COUNTRY}{PUBLISHER_SUFFIX}")
}

/// Case-insensitive column lookup against a list of names.
pub fn find_column<'a, I>(names: I, wanted: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut fallback = None;
    for name in names {
        if name == wanted {
            return Some(name.to_string());
        }
        if fallback.is_none() && name.eq_ignore_ascii_case(wanted) {
            fallback = Some(name.to_string());
        }
    }
    fallback
}

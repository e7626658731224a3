#![deny(unsafe_code)]

//! Lookup tables driving derivation and segmentation.
//!
//! The tables live in `standards/lookups.toml`. A copy of that file is
//! embedded at build time and used unless `VGC_STANDARDS_DIR` or an explicit
//! path selects another one, so the pipeline never runs without tables.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StandardsError;
use crate::hash::sha256_hex;
use crate::paths::{LOOKUPS_FILE_NAME, standards_dir_override};

pub const LOOKUPS_SCHEMA: &str = "vgc.lookups";
pub const LOOKUPS_SCHEMA_VERSION: u32 = 1;

/// Label assigned to platform codes absent from the generation table.
pub const OTHER_GENERATION: &str = "Other";

const EMBEDDED_LOOKUPS: &str = include_str!("../../../standards/lookups.toml");
const EMBEDDED_ORIGIN: &str = "<embedded lookups.toml>";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LookupsFile {
    lookups: LookupsHeader,
    platform_generations: BTreeMap<String, String>,
    segments: SegmentRules,
    cleaning: CleaningRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LookupsHeader {
    schema: String,
    schema_version: u32,
}

/// Allow-lists and thresholds for the segmented views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRules {
    pub recent_year_threshold: i32,
    pub major_publishers: BTreeSet<String>,
    pub top_platforms: BTreeSet<String>,
}

/// Text, date and column rules for the chart cleaner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningRules {
    #[serde(default)]
    pub placeholders: BTreeSet<String>,
    pub date_formats: Vec<String>,
    pub min_year: i32,
    pub max_year: i32,
    #[serde(default)]
    pub column_aliases: BTreeMap<String, String>,
}

/// Parsed, validated lookup tables plus the digest of their source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTables {
    pub platform_generations: BTreeMap<String, String>,
    pub segments: SegmentRules,
    pub cleaning: CleaningRules,
    /// Where the tables were read from.
    pub origin: String,
    /// SHA-256 of the source text.
    pub sha256: String,
}

impl LookupTables {
    /// Generation label for a platform code, `"Other"` when unmapped.
    pub fn generation_for(&self, platform: &str) -> &str {
        self.platform_generations
            .get(platform)
            .map(String::as_str)
            .unwrap_or(OTHER_GENERATION)
    }

    pub fn has_generation(&self, platform: &str) -> bool {
        self.platform_generations.contains_key(platform)
    }

    /// Every label the generation lookup can produce, including `"Other"`.
    pub fn generation_labels(&self) -> BTreeSet<&str> {
        let mut labels: BTreeSet<&str> = self
            .platform_generations
            .values()
            .map(String::as_str)
            .collect();
        labels.insert(OTHER_GENERATION);
        labels
    }

    pub fn is_major_publisher(&self, publisher: &str) -> bool {
        self.segments.major_publishers.contains(publisher)
    }

    pub fn is_top_platform(&self, platform: &str) -> bool {
        self.segments.top_platforms.contains(platform)
    }

    /// True for literal strings that stand for an absent text value.
    pub fn is_placeholder(&self, value: &str) -> bool {
        self.cleaning.placeholders.contains(value)
    }

    /// Canonical column name for a raw alias.
    pub fn canonical_column(&self, raw: &str) -> Option<&str> {
        self.cleaning
            .column_aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(raw.trim()))
            .map(|(_, canonical)| canonical.as_str())
    }

    pub fn year_is_plausible(&self, year: i32) -> bool {
        (self.cleaning.min_year..=self.cleaning.max_year).contains(&year)
    }
}

/// Parse and validate lookup tables from TOML text.
pub fn parse_lookups(text: &str, origin: &str) -> Result<LookupTables, StandardsError> {
    let file: LookupsFile = toml::from_str(text).map_err(|source| StandardsError::Toml {
        origin: origin.to_string(),
        source,
    })?;
    validate(&file, origin)?;
    Ok(LookupTables {
        platform_generations: file.platform_generations,
        segments: file.segments,
        cleaning: file.cleaning,
        origin: origin.to_string(),
        sha256: sha256_hex(text.as_bytes()),
    })
}

/// Load lookup tables from an explicit file.
pub fn load_lookups(path: &Path) -> Result<LookupTables, StandardsError> {
    let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    let tables = parse_lookups(&text, &path.display().to_string())?;
    debug!(
        origin = %tables.origin,
        platforms = tables.platform_generations.len(),
        "lookup tables loaded"
    );
    Ok(tables)
}

/// Load the default lookup tables.
///
/// Uses `$VGC_STANDARDS_DIR/lookups.toml` when the variable is set, and the
/// embedded copy of `standards/lookups.toml` otherwise.
pub fn load_default_lookups() -> Result<LookupTables, StandardsError> {
    match standards_dir_override() {
        Some(dir) => load_lookups(&dir.join(LOOKUPS_FILE_NAME)),
        None => embedded_lookups(),
    }
}

/// The lookup tables compiled into the binary.
pub fn embedded_lookups() -> Result<LookupTables, StandardsError> {
    parse_lookups(EMBEDDED_LOOKUPS, EMBEDDED_ORIGIN)
}

fn validate(file: &LookupsFile, origin: &str) -> Result<(), StandardsError> {
    if file.lookups.schema != LOOKUPS_SCHEMA {
        return Err(StandardsError::invalid(
            origin,
            format!(
                "schema must be {LOOKUPS_SCHEMA}, found {}",
                file.lookups.schema
            ),
        ));
    }
    if file.lookups.schema_version != LOOKUPS_SCHEMA_VERSION {
        return Err(StandardsError::invalid(
            origin,
            format!(
                "unsupported schema_version {}",
                file.lookups.schema_version
            ),
        ));
    }
    for (platform, label) in &file.platform_generations {
        if label.trim().is_empty() {
            return Err(StandardsError::invalid(
                origin,
                format!("empty generation label for platform {platform}"),
            ));
        }
    }
    if file.cleaning.date_formats.is_empty() {
        return Err(StandardsError::invalid(origin, "date_formats is empty"));
    }
    if file.cleaning.min_year > file.cleaning.max_year {
        return Err(StandardsError::invalid(
            origin,
            format!(
                "min_year {} is after max_year {}",
                file.cleaning.min_year, file.cleaning.max_year
            ),
        ));
    }
    if file.cleaning.min_year < 1000 || file.cleaning.max_year > 9999 {
        return Err(StandardsError::invalid(
            origin,
            "year bounds must be four-digit years",
        ));
    }
    Ok(())
}

//! Source dataset identities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema;

/// One of the raw source tables the pipeline knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Primary sales-chart table.
    Charts,
    Developers,
    Publishers,
    /// Geography-by-city reference (pass-through).
    GeoCities,
    /// Geography-by-country reference, joined on publisher country.
    GeoCountries,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::Charts,
        DatasetKind::Developers,
        DatasetKind::Publishers,
        DatasetKind::GeoCities,
        DatasetKind::GeoCountries,
    ];

    /// Stable dataset name used in logs and artifact names.
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Charts => "charts",
            DatasetKind::Developers => "developers",
            DatasetKind::Publishers => "publishers",
            DatasetKind::GeoCities => "geo_cities",
            DatasetKind::GeoCountries => "geo_countries",
        }
    }

    /// Default file name of the raw table inside a data directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            DatasetKind::Charts => "vg_charts.csv",
            DatasetKind::Developers => "vg_developers.csv",
            DatasetKind::Publishers => "vg_publishers.csv",
            DatasetKind::GeoCities => "vg_geo_cities.csv",
            DatasetKind::GeoCountries => "vg_geo_countries.csv",
        }
    }

    /// Join key column for registry tables.
    pub fn registry_key(self) -> Option<&'static str> {
        match self {
            DatasetKind::Developers => Some(schema::DEVELOPER),
            DatasetKind::Publishers => Some(schema::PUBLISHER),
            _ => None,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        DatasetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown dataset: {value}"))
    }
}

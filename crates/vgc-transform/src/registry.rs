//! Developer, publisher and geography registry normalization.

use polars::prelude::*;
use tracing::{debug, info_span, warn};

use vgc_ingest::LoadedTables;
use vgc_model::DatasetKind;
use vgc_model::schema::{CITY, COUNTRY, UNKNOWN, find_column};

use crate::data_utils::{optional_string_column, set_optional_string_column, set_string_column};
use crate::error::{Result, TransformError};

/// Normalized registries, each absent when its source failed to load.
#[derive(Debug, Clone, Default)]
pub struct RegistryTables {
    pub developers: Option<DataFrame>,
    pub publishers: Option<DataFrame>,
    /// Passed through unchanged.
    pub geo_cities: Option<DataFrame>,
    /// Passed through unchanged; the merger normalizes its key.
    pub geo_countries: Option<DataFrame>,
}

impl RegistryTables {
    pub fn get(&self, dataset: DatasetKind) -> Option<&DataFrame> {
        match dataset {
            DatasetKind::Developers => self.developers.as_ref(),
            DatasetKind::Publishers => self.publishers.as_ref(),
            DatasetKind::GeoCities => self.geo_cities.as_ref(),
            DatasetKind::GeoCountries => self.geo_countries.as_ref(),
            DatasetKind::Charts => None,
        }
    }

    /// Present tables in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = (DatasetKind, &DataFrame)> {
        DatasetKind::ALL
            .into_iter()
            .filter_map(|dataset| self.get(dataset).map(|df| (dataset, df)))
    }
}

fn locate(df: &DataFrame, wanted: &str) -> Option<String> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    find_column(names.iter().map(String::as_str), wanted)
}

/// Trim the key column and fill absent city and country with "Unknown".
///
/// Blank keys become null so they never match a chart row. The key column is
/// renamed to `key` when it was found under a different case.
pub fn normalize_registry(df: &DataFrame, key: &str) -> Result<DataFrame> {
    let mut out = df.clone();
    let found = locate(&out, key).ok_or_else(|| TransformError::MissingColumn {
        table: format!("{key} registry"),
        column: key.to_string(),
    })?;
    if found != key {
        out.rename(&found, key.into())?;
    }

    let keys: Vec<Option<String>> = optional_string_column(&out, key)?
        .into_iter()
        .map(|value| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
        .collect();
    let null_keys = keys.iter().filter(|k| k.is_none()).count();
    if null_keys > 0 {
        warn!(key, null_keys, "registry rows without a key will never match");
    }
    set_optional_string_column(&mut out, key, keys)?;

    for attribute in [CITY, COUNTRY] {
        let Some(column) = locate(&out, attribute) else {
            continue;
        };
        let mut filled = 0usize;
        let values: Vec<String> = optional_string_column(&out, &column)?
            .into_iter()
            .map(|value| match value.map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => v,
                _ => {
                    filled += 1;
                    UNKNOWN.to_string()
                }
            })
            .collect();
        debug!(key, column = %column, filled, "registry attribute filled");
        set_string_column(&mut out, &column, values)?;
    }

    Ok(out)
}

/// Normalize every loaded registry. Missing registries stay absent.
pub fn normalize_registries(loaded: &LoadedTables) -> Result<RegistryTables> {
    let span = info_span!("normalize_registries");
    let _guard = span.enter();

    let mut registries = RegistryTables::default();
    for dataset in [DatasetKind::Developers, DatasetKind::Publishers] {
        let Some(table) = loaded.get(dataset) else {
            debug!(dataset = %dataset, "registry not loaded");
            continue;
        };
        let Some(key) = dataset.registry_key() else {
            continue;
        };
        let normalized = normalize_registry(&table.data, key)?;
        match dataset {
            DatasetKind::Developers => registries.developers = Some(normalized),
            _ => registries.publishers = Some(normalized),
        }
    }
    registries.geo_cities = loaded.get(DatasetKind::GeoCities).map(|t| t.data.clone());
    registries.geo_countries = loaded
        .get(DatasetKind::GeoCountries)
        .map(|t| t.data.clone());

    debug!(tables = registries.iter().count(), "registries normalized");
    Ok(registries)
}

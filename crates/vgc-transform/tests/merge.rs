//! Join contract: left-outer semantics, naming policy and duplicate keys.

use polars::prelude::*;
use vgc_model::DuplicateKeyPolicy;
use vgc_transform::{RegistryTables, TransformError, merge_tables, normalize_registry};

fn charts() -> DataFrame {
    df! {
        "title" => &["Halo", "Sonic", "Indie Gem"],
        "platform" => &["XBOX", "GEN", "PC"],
        "publisher" => &["Microsoft", "Sega", "Tiny Press"],
        "developer" => &["Bungie", "Sonic Team", "Solo Dev"],
        "total_sales" => &[6.49, 4.34, 0.01],
    }
    .unwrap()
}

fn registries() -> RegistryTables {
    let developers = df! {
        "developer" => &["Bungie", "Sonic Team"],
        "city" => &["Bellevue", "Tokyo"],
        "country" => &["USA", "Japan"],
    }
    .unwrap();
    let publishers = df! {
        "publisher" => &["Microsoft", " Sega "],
        "city" => &[Some("Redmond"), None],
        "country" => &["\"USA\"", "Japan"],
    }
    .unwrap();
    let geo_countries = df! {
        "Country" => &["USA", " 'Japan' "],
        "Region" => &["North America", "Asia"],
    }
    .unwrap();
    RegistryTables {
        developers: Some(normalize_registry(&developers, "developer").unwrap()),
        publishers: Some(normalize_registry(&publishers, "publisher").unwrap()),
        geo_cities: None,
        geo_countries: Some(geo_countries),
    }
}

fn text(df: &DataFrame, column: &str, row: usize) -> Option<String> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .get(row)
        .map(str::to_string)
}

#[test]
fn merged_schema_uses_join_suffixes() {
    let merged = merge_tables(&charts(), &registries(), DuplicateKeyPolicy::FirstMatch).unwrap();
    let names: Vec<String> = merged
        .data
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    insta::assert_debug_snapshot!(names, @r#"
    [
        "title",
        "platform",
        "publisher",
        "developer",
        "total_sales",
        "city_dev",
        "country_dev",
        "city_pub",
        "country_pub",
        "Country_geo",
        "Region_geo",
    ]
    "#);
}

#[test]
fn matched_rows_carry_registry_values() {
    let merged = merge_tables(&charts(), &registries(), DuplicateKeyPolicy::FirstMatch).unwrap();
    let df = &merged.data;

    assert_eq!(df.height(), 3);
    assert_eq!(text(df, "city_dev", 0).as_deref(), Some("Bellevue"));
    assert_eq!(text(df, "country_dev", 1).as_deref(), Some("Japan"));
    assert_eq!(text(df, "city_pub", 0).as_deref(), Some("Redmond"));
    // Absent registry city was filled during normalization.
    assert_eq!(text(df, "city_pub", 1).as_deref(), Some("Unknown"));
    // Geography matched on the quote-stripped publisher country.
    assert_eq!(text(df, "Country_geo", 0).as_deref(), Some("USA"));
    assert_eq!(text(df, "Country_geo", 1).as_deref(), Some("Japan"));
    assert_eq!(text(df, "Region_geo", 1).as_deref(), Some("Asia"));
}

#[test]
fn unmatched_publisher_keeps_chart_fields() {
    let input = charts();
    let merged = merge_tables(&input, &registries(), DuplicateKeyPolicy::FirstMatch).unwrap();
    let df = &merged.data;

    assert_eq!(text(df, "city_pub", 2), None);
    assert_eq!(text(df, "country_pub", 2), None);
    assert_eq!(text(df, "Region_geo", 2), None);
    assert_eq!(text(df, "city_dev", 2), None);
    for column in ["title", "platform", "publisher", "developer"] {
        assert_eq!(text(df, column, 2), text(&input, column, 2));
    }
    assert_eq!(
        df.column("total_sales").unwrap().f64().unwrap().get(2),
        Some(0.01)
    );

    let publishers = &merged.joins[1];
    assert_eq!(publishers.stage, "publishers");
    assert_eq!(publishers.matched_rows, 2);
    assert_eq!(publishers.unmatched_rows, 1);
    assert!(!publishers.skipped);
}

fn duplicated_developers() -> RegistryTables {
    let developers = df! {
        "developer" => &["Bungie", "Bungie", "Sonic Team"],
        "city" => &["Bellevue", "Chicago", "Tokyo"],
        "country" => &["USA", "USA", "Japan"],
    }
    .unwrap();
    RegistryTables {
        developers: Some(developers),
        ..RegistryTables::default()
    }
}

#[test]
fn first_match_keeps_row_count() {
    let merged =
        merge_tables(&charts(), &duplicated_developers(), DuplicateKeyPolicy::FirstMatch).unwrap();
    assert_eq!(merged.data.height(), 3);
    assert_eq!(text(&merged.data, "city_dev", 0).as_deref(), Some("Bellevue"));
    assert_eq!(merged.joins[0].duplicate_keys, 1);
    assert_eq!(merged.joins[0].added_rows, 0);
}

#[test]
fn fan_out_multiplies_rows_in_order() {
    let merged =
        merge_tables(&charts(), &duplicated_developers(), DuplicateKeyPolicy::FanOut).unwrap();
    let df = &merged.data;
    assert_eq!(df.height(), 4);
    assert_eq!(text(df, "title", 0).as_deref(), Some("Halo"));
    assert_eq!(text(df, "title", 1).as_deref(), Some("Halo"));
    assert_eq!(text(df, "city_dev", 1).as_deref(), Some("Chicago"));
    assert_eq!(text(df, "title", 2).as_deref(), Some("Sonic"));
    assert_eq!(merged.joins[0].added_rows, 1);
}

#[test]
fn reject_names_registry_and_key() {
    let err =
        merge_tables(&charts(), &duplicated_developers(), DuplicateKeyPolicy::Reject).unwrap_err();
    match err {
        TransformError::DuplicateKeys { registry, key, count } => {
            assert_eq!(registry, "developers");
            assert_eq!(key, "Bungie");
            assert_eq!(count, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_registries_skip_their_stages() {
    let merged = merge_tables(
        &charts(),
        &RegistryTables::default(),
        DuplicateKeyPolicy::FirstMatch,
    )
    .unwrap();
    assert_eq!(merged.data.height(), 3);
    assert_eq!(merged.data.width(), 5);
    assert_eq!(merged.joins.len(), 3);
    assert!(merged.joins.iter().all(|join| join.skipped));
}

#[test]
fn suffixed_name_collision_is_an_error() {
    let mut input = charts();
    input
        .with_column(Series::new("city_dev".into(), &["x", "y", "z"]))
        .unwrap();
    let err = merge_tables(&input, &registries(), DuplicateKeyPolicy::FirstMatch).unwrap_err();
    assert!(matches!(
        err,
        TransformError::ColumnCollision { ref column, .. } if column == "city_dev"
    ));
}

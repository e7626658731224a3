//! View independence and predicate behavior.

use polars::prelude::*;
use vgc_model::SegmentKind;
use vgc_standards::embedded_lookups;
use vgc_transform::{TransformError, segment};

fn merged() -> DataFrame {
    df! {
        "title" => &["A", "B", "C", "D", "E"],
        "platform" => &["PS4", "GB", "PC", "PS4", "N64"],
        "publisher" => &["Nintendo", "Nintendo", "Tiny Press", "Sega", "Unknown"],
        "year" => &[Some(2015), Some(1990), None, Some(2010), Some(1999)],
        "has_complete_sales" => &[true, false, true, true, false],
    }
    .unwrap()
}

fn titles(df: &DataFrame) -> Vec<String> {
    df.column("title")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

#[test]
fn each_view_applies_its_own_predicate() {
    let views = segment(&merged(), &embedded_lookups().unwrap()).unwrap();

    let view = |kind| titles(views.get(kind).unwrap());
    assert_eq!(view(SegmentKind::CompleteSales), vec!["A", "C", "D"]);
    // Null year is excluded; the threshold year itself is included.
    assert_eq!(view(SegmentKind::RecentGames), vec!["A", "D"]);
    assert_eq!(view(SegmentKind::MajorPublishers), vec!["A", "B", "D"]);
    assert_eq!(view(SegmentKind::TopPlatforms), vec!["A", "C", "D"]);
}

#[test]
fn rows_matching_several_predicates_appear_once_in_each() {
    let views = segment(&merged(), &embedded_lookups().unwrap()).unwrap();

    for (kind, df) in views.iter() {
        let names = titles(df);
        let a_count = names.iter().filter(|t| *t == "A").count();
        assert_eq!(a_count, 1, "row A once in {kind}");
    }

    let counts = views.counts();
    let total: usize = counts.values().sum();
    assert_eq!(counts.len(), 4);
    assert!(counts.values().all(|count| *count <= total));
    assert_eq!(total, 3 + 2 + 3 + 3);
}

#[test]
fn recent_threshold_comes_from_lookups() {
    let mut lookups = embedded_lookups().unwrap();
    lookups.segments.recent_year_threshold = 1995;
    let views = segment(&merged(), &lookups).unwrap();
    assert_eq!(
        titles(views.get(SegmentKind::RecentGames).unwrap()),
        vec!["A", "D", "E"]
    );
}

#[test]
fn missing_flag_column_is_reported() {
    let df = merged().drop("has_complete_sales").unwrap();
    let err = segment(&df, &embedded_lookups().unwrap()).unwrap_err();
    assert!(matches!(
        err,
        TransformError::MissingColumn { ref column, .. } if column == "has_complete_sales"
    ));
}

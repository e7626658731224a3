//! Chart cleaning behavior on hand-built raw frames.

use polars::prelude::*;
use vgc_standards::{LookupTables, embedded_lookups};
use vgc_transform::clean_charts;

fn lookups() -> LookupTables {
    embedded_lookups().expect("embedded lookups")
}

/// Raw chart frame with every column typed as String, as the loader reads it.
fn raw_charts(rows: &[[Option<&str>; 12]]) -> DataFrame {
    let names = [
        "title",
        "platform",
        "genre",
        "publisher",
        "developer",
        "release_date",
        "na_sales",
        "jp_sales",
        "pal_sales",
        "other_sales",
        "total_sales",
        "critic_score",
    ];
    let columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<Option<&str>> = rows.iter().map(|row| row[idx]).collect();
            Series::new((*name).into(), values).into()
        })
        .collect();
    DataFrame::new(columns).expect("raw frame")
}

fn f64_at(df: &DataFrame, column: &str, row: usize) -> Option<f64> {
    df.column(column).unwrap().f64().unwrap().get(row)
}

#[test]
fn ps_row_with_missing_jp_sales() {
    let raw = raw_charts(&[[
        Some("Gran Turismo"),
        Some("PS"),
        Some("Racing"),
        Some("Sony Computer Entertainment"),
        Some("Polyphony Digital"),
        Some("1998-11-30"),
        Some("2.0"),
        None,
        Some("1.0"),
        Some("0.5"),
        Some("5.0"),
        None,
    ]]);

    let cleaned = clean_charts(&raw, &lookups()).expect("clean");
    let df = &cleaned.data;

    assert_eq!(df.column("year").unwrap().i32().unwrap().get(0), Some(1998));
    assert_eq!(df.column("decade").unwrap().i32().unwrap().get(0), Some(1990));
    assert_eq!(
        df.column("release_date_clean").unwrap().str().unwrap().get(0),
        Some("1998-11-30")
    );
    assert_eq!(
        df.column("platform_generation").unwrap().str().unwrap().get(0),
        Some("5th Gen")
    );
    assert_eq!(f64_at(df, "na_sales", 0), Some(2.0));
    assert_eq!(f64_at(df, "jp_sales", 0), Some(0.0));
    assert_eq!(f64_at(df, "pal_sales", 0), Some(1.0));
    assert_eq!(f64_at(df, "other_sales", 0), Some(0.5));
    assert_eq!(f64_at(df, "calculated_total", 0), Some(3.5));
    assert_eq!(f64_at(df, "total_sales", 0), Some(5.0));
    assert_eq!(f64_at(df, "critic_score", 0), Some(0.0));
    assert_eq!(
        df.column("has_complete_sales").unwrap().bool().unwrap().get(0),
        Some(false)
    );

    assert_eq!(cleaned.report.incomplete_sales_rows, 1);
    assert_eq!(cleaned.report.filled_sales.get("jp_sales"), Some(&1));
    assert_eq!(cleaned.report.filled_critic_scores, 1);
}

#[test]
fn completeness_flag_is_not_always_true() {
    let raw = raw_charts(&[
        [
            Some("A"),
            Some("PS2"),
            Some("Action"),
            Some("Sega"),
            Some("Sega"),
            Some("2004-03-01"),
            Some("1.0"),
            Some("0.2"),
            Some("0.3"),
            Some("0.1"),
            Some("1.6"),
            Some("7.5"),
        ],
        [
            Some("B"),
            Some("PS2"),
            Some("Action"),
            Some("Sega"),
            Some("Sega"),
            Some("2004-03-01"),
            Some("1.0"),
            Some("0.2"),
            Some(""),
            Some("0.1"),
            Some("1.3"),
            Some("7.5"),
        ],
        [
            Some("C"),
            Some("PS2"),
            Some("Action"),
            Some("Sega"),
            Some("Sega"),
            Some("2004-03-01"),
            Some("-1"),
            Some("0.2"),
            Some("0.3"),
            Some("n/a"),
            Some("0.5"),
            Some("7.5"),
        ],
    ]);

    let cleaned = clean_charts(&raw, &lookups()).expect("clean");
    let flags: Vec<Option<bool>> = cleaned
        .data
        .column("has_complete_sales")
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .collect();

    // Zero-fill runs after the flag, so the filled rows must still read false.
    assert_eq!(flags, vec![Some(true), Some(false), Some(false)]);
    assert_eq!(f64_at(&cleaned.data, "pal_sales", 1), Some(0.0));
    assert_eq!(f64_at(&cleaned.data, "na_sales", 2), Some(0.0));
    assert_eq!(f64_at(&cleaned.data, "calculated_total", 2), Some(0.5));
}

#[test]
fn unparseable_dates_never_get_a_year() {
    let raw = raw_charts(&[
        [
            Some("Soon"),
            Some("NS"),
            None,
            None,
            None,
            Some("TBA"),
            Some("0"),
            Some("0"),
            Some("0"),
            Some("0"),
            Some("0"),
            None,
        ],
        [
            Some("Old"),
            Some("GB"),
            None,
            None,
            None,
            Some("1989"),
            Some("0"),
            Some("0"),
            Some("0"),
            Some("0"),
            Some("0"),
            None,
        ],
    ]);

    let cleaned = clean_charts(&raw, &lookups()).expect("clean");
    let years = cleaned.data.column("year").unwrap().i32().unwrap().clone();
    assert_eq!(years.get(0), None);
    assert_eq!(years.get(1), Some(1989));
    assert_eq!(
        cleaned.data.column("decade").unwrap().i32().unwrap().get(0),
        None
    );
    assert_eq!(cleaned.report.unparsed_dates, 1);
}

#[test]
fn text_placeholders_and_unmapped_platforms() {
    let raw = raw_charts(&[[
        Some(" Tetris "),
        Some("Atari2600"),
        Some("nan"),
        Some(""),
        None,
        Some("1982-01-01"),
        Some("1"),
        Some("1"),
        Some("1"),
        Some("1"),
        Some("4"),
        Some("8"),
    ]]);

    let cleaned = clean_charts(&raw, &lookups()).expect("clean");
    let df = &cleaned.data;
    let text = |column: &str| {
        df.column(column)
            .unwrap()
            .str()
            .unwrap()
            .get(0)
            .map(str::to_string)
    };

    assert_eq!(text("title").as_deref(), Some("Tetris"));
    assert_eq!(text("genre").as_deref(), Some("Unknown"));
    assert_eq!(text("publisher").as_deref(), Some("Unknown"));
    assert_eq!(text("developer").as_deref(), Some("Unknown"));
    assert_eq!(text("platform_generation").as_deref(), Some("Other"));
    assert_eq!(cleaned.report.unmapped_platforms, 1);
    assert_eq!(cleaned.report.unknown_text.get("genre"), Some(&1));
}

#[test]
fn aliased_columns_are_renamed() {
    let raw = df! {
        "Name" => &["Halo"],
        "console" => &["XBOX"],
        "release_date" => &["2001-11-15"],
        "na_sales" => &["4.98"],
        "jp_sales" => &["0.14"],
        "pal_sales" => &["1.3"],
        "other_sales" => &["0.07"],
        "total_sales" => &["6.49"],
        "Critic_Score" => &["9.7"],
        "extra" => &["kept"],
    }
    .unwrap();

    let cleaned = clean_charts(&raw, &lookups()).expect("clean");
    let df = &cleaned.data;

    assert_eq!(df.column("title").unwrap().str().unwrap().get(0), Some("Halo"));
    assert_eq!(
        df.column("platform_generation").unwrap().str().unwrap().get(0),
        Some("6th Gen")
    );
    assert_eq!(df.column("extra").unwrap().str().unwrap().get(0), Some("kept"));
    assert_eq!(
        cleaned.report.renamed_columns.get("platform").map(String::as_str),
        Some("console")
    );
    assert_eq!(
        cleaned.report.renamed_columns.get("critic_score").map(String::as_str),
        Some("Critic_Score")
    );
}

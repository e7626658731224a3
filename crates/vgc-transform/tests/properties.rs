//! Property tests over generated chart rows.

use polars::prelude::*;
use proptest::prelude::*;
use vgc_standards::embedded_lookups;
use vgc_transform::{clean_charts, decade_for};

fn sales_cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("n/a".to_string())),
        (-5.0f64..50.0).prop_map(|v| Some(format!("{v:.2}"))),
    ]
}

fn date_cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("TBA".to_string())),
        (1900i32..2200, 1u32..13, 1u32..29)
            .prop_map(|(y, m, d)| Some(format!("{y:04}-{m:02}-{d:02}"))),
        (1900i32..2200).prop_map(|y| Some(y.to_string())),
        "[0-9/ -]{0,10}".prop_map(Some),
    ]
}

#[derive(Debug, Clone)]
struct RawRow {
    platform: String,
    release_date: Option<String>,
    sales: [Option<String>; 5],
}

fn raw_row() -> impl Strategy<Value = RawRow> {
    (
        prop_oneof![Just("PS2"), Just("GB"), Just("PC"), Just("ZX81"), Just("")],
        date_cell(),
        [sales_cell(), sales_cell(), sales_cell(), sales_cell(), sales_cell()],
    )
        .prop_map(|(platform, release_date, sales)| RawRow {
            platform: platform.to_string(),
            release_date,
            sales,
        })
}

fn frame(rows: &[RawRow]) -> DataFrame {
    let mut columns: Vec<Column> = vec![
        Series::new(
            "platform".into(),
            rows.iter().map(|r| Some(r.platform.clone())).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "release_date".into(),
            rows.iter().map(|r| r.release_date.clone()).collect::<Vec<_>>(),
        )
        .into(),
    ];
    let sales = ["na_sales", "jp_sales", "pal_sales", "other_sales", "total_sales"];
    for (idx, name) in sales.iter().enumerate() {
        let values: Vec<Option<String>> = rows.iter().map(|r| r.sales[idx].clone()).collect();
        columns.push(Series::new((*name).into(), values).into());
    }
    columns.push(Series::new("critic_score".into(), vec![None::<String>; rows.len()]).into());
    DataFrame::new(columns).unwrap()
}

proptest! {
    #[test]
    fn years_are_plausible_and_decades_consistent(rows in prop::collection::vec(raw_row(), 1..20)) {
        let lookups = embedded_lookups().unwrap();
        let cleaned = clean_charts(&frame(&rows), &lookups).unwrap();
        let years = cleaned.data.column("year").unwrap().i32().unwrap().clone();
        let decades = cleaned.data.column("decade").unwrap().i32().unwrap().clone();
        let dates = cleaned.data.column("release_date_clean").unwrap().str().unwrap().clone();

        for (idx, row) in rows.iter().enumerate() {
            match years.get(idx) {
                Some(year) => {
                    prop_assert!(lookups.year_is_plausible(year));
                    prop_assert!(row.release_date.as_deref().is_some_and(|d| d.contains(&year.to_string())));
                    prop_assert_eq!(decades.get(idx), Some(decade_for(year)));
                    prop_assert_eq!(decades.get(idx).map(|d| d % 10), Some(0));
                    prop_assert!(dates.get(idx).is_some());
                }
                None => {
                    prop_assert_eq!(decades.get(idx), None);
                    prop_assert_eq!(dates.get(idx), None);
                }
            }
        }
    }

    #[test]
    fn sales_non_negative_and_total_is_regional_sum(rows in prop::collection::vec(raw_row(), 1..20)) {
        let lookups = embedded_lookups().unwrap();
        let cleaned = clean_charts(&frame(&rows), &lookups).unwrap();
        let df = &cleaned.data;
        let col = |name: &str| df.column(name).unwrap().f64().unwrap().clone();
        let regional = [col("na_sales"), col("jp_sales"), col("pal_sales"), col("other_sales")];
        let totals = col("calculated_total");
        let supplied = col("total_sales");

        for idx in 0..rows.len() {
            let mut sum = 0.0;
            for values in &regional {
                let value = values.get(idx).unwrap();
                prop_assert!(value >= 0.0);
                sum += value;
            }
            prop_assert!(supplied.get(idx).unwrap() >= 0.0);
            prop_assert!((totals.get(idx).unwrap() - sum).abs() < 1e-9);
        }
    }

    #[test]
    fn generation_is_a_known_label(rows in prop::collection::vec(raw_row(), 1..20)) {
        let lookups = embedded_lookups().unwrap();
        let labels = lookups.generation_labels();
        let cleaned = clean_charts(&frame(&rows), &lookups).unwrap();
        let generations = cleaned.data.column("platform_generation").unwrap().str().unwrap().clone();
        for idx in 0..rows.len() {
            let label = generations.get(idx).unwrap();
            prop_assert!(labels.contains(label));
        }
    }
}

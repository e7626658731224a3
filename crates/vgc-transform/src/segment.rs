//! Segmented views over the merged table.
//!
//! Views are independent filters: a row may land in several of them, and
//! each view keeps the merged table's row order.

use std::collections::BTreeMap;

use polars::prelude::*;
use tracing::{debug, info_span};

use vgc_model::SegmentKind;
use vgc_model::schema::{HAS_COMPLETE_SALES, PLATFORM, PUBLISHER, YEAR};
use vgc_standards::LookupTables;

use crate::data_utils::{bool_column, filter_rows, has_column, numeric_column_i64, string_column};
use crate::error::{Result, TransformError};

const TABLE: &str = "merged charts";

/// The four named views, keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct SegmentedViews {
    views: BTreeMap<SegmentKind, DataFrame>,
}

impl SegmentedViews {
    pub fn get(&self, kind: SegmentKind) -> Option<&DataFrame> {
        self.views.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegmentKind, &DataFrame)> {
        self.views.iter().map(|(kind, df)| (*kind, df))
    }

    pub fn counts(&self) -> BTreeMap<SegmentKind, usize> {
        self.views
            .iter()
            .map(|(kind, df)| (*kind, df.height()))
            .collect()
    }
}

/// Row mask for one view.
pub fn segment_mask(df: &DataFrame, kind: SegmentKind, lookups: &LookupTables) -> Result<Vec<bool>> {
    let column = match kind {
        SegmentKind::CompleteSales => HAS_COMPLETE_SALES,
        SegmentKind::RecentGames => YEAR,
        SegmentKind::MajorPublishers => PUBLISHER,
        SegmentKind::TopPlatforms => PLATFORM,
    };
    if !has_column(df, column) {
        return Err(TransformError::missing(TABLE, column));
    }

    let mask = match kind {
        SegmentKind::CompleteSales => bool_column(df, column)?
            .into_iter()
            .map(|flag| flag.unwrap_or(false))
            .collect(),
        SegmentKind::RecentGames => {
            let threshold = i64::from(lookups.segments.recent_year_threshold);
            numeric_column_i64(df, column)?
                .into_iter()
                .map(|year| year.is_some_and(|y| y >= threshold))
                .collect()
        }
        SegmentKind::MajorPublishers => string_column(df, column)?
            .iter()
            .map(|publisher| lookups.is_major_publisher(publisher))
            .collect(),
        SegmentKind::TopPlatforms => string_column(df, column)?
            .iter()
            .map(|platform| lookups.is_top_platform(platform))
            .collect(),
    };
    Ok(mask)
}

/// Build every view from the merged table.
pub fn segment(merged: &DataFrame, lookups: &LookupTables) -> Result<SegmentedViews> {
    let span = info_span!("segment", rows = merged.height());
    let _guard = span.enter();

    let mut views = BTreeMap::new();
    for kind in SegmentKind::ALL {
        let mask = segment_mask(merged, kind, lookups)?;
        let view = filter_rows(merged, &mask)?;
        debug!(view = %kind, rows = view.height(), "view built");
        views.insert(kind, view);
    }
    Ok(SegmentedViews { views })
}

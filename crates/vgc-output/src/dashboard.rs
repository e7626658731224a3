//! Read-only query context over persisted artifacts.
//!
//! The context loads the merged table and the dashboard views once and
//! answers filter and metric queries against them. It never writes back and
//! never recomputes pipeline attributes.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info};

use vgc_ingest::read_csv_table;
use vgc_model::SegmentKind;
use vgc_model::schema::{
    CRITIC_SCORE, GENRE, PLATFORM, PUBLISHER, REGIONAL_SALES, TITLE, TOTAL_SALES, YEAR,
};
use vgc_transform::data_utils::{
    filter_rows, has_column, numeric_column_f64, numeric_column_i64, string_column,
};

use crate::error::{OutputError, Result};
use crate::writer::MERGED_CHARTS_FILE;

/// Frames the dashboard can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DashboardView {
    Merged,
    RecentGames,
    MajorPublishers,
    TopPlatforms,
}

impl DashboardView {
    pub const ALL: [DashboardView; 4] = [
        DashboardView::Merged,
        DashboardView::RecentGames,
        DashboardView::MajorPublishers,
        DashboardView::TopPlatforms,
    ];

    pub fn file_name(self) -> String {
        match self.segment() {
            Some(kind) => kind.file_name(),
            None => MERGED_CHARTS_FILE.to_string(),
        }
    }

    fn segment(self) -> Option<SegmentKind> {
        match self {
            DashboardView::Merged => None,
            DashboardView::RecentGames => Some(SegmentKind::RecentGames),
            DashboardView::MajorPublishers => Some(SegmentKind::MajorPublishers),
            DashboardView::TopPlatforms => Some(SegmentKind::TopPlatforms),
        }
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.segment() {
            Some(kind) => write!(f, "{kind}"),
            None => f.write_str("merged"),
        }
    }
}

/// Platform, genre and inclusive year-range filters. None means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    pub platform: Option<String>,
    pub genre: Option<String>,
    pub year_range: Option<(i32, i32)>,
}

impl DashboardFilter {
    pub fn is_empty(&self) -> bool {
        self.platform.is_none() && self.genre.is_none() && self.year_range.is_none()
    }
}

/// Headline numbers for a filtered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMetrics {
    pub games: usize,
    pub total_sales: f64,
    /// None for an empty selection.
    pub average_sales: Option<f64>,
    pub platforms: usize,
    /// Sum of each regional sales column present in the frame.
    pub regional_sales: Vec<(String, f64)>,
}

impl KeyMetrics {
    pub fn compute(df: &DataFrame) -> Result<Self> {
        let sales: Vec<f64> = if has_column(df, TOTAL_SALES) {
            numeric_column_f64(df, TOTAL_SALES)?
                .into_iter()
                .flatten()
                .collect()
        } else {
            Vec::new()
        };
        let total_sales: f64 = sales.iter().sum();
        let average_sales = (!sales.is_empty()).then(|| total_sales / sales.len() as f64);

        let platforms = if has_column(df, PLATFORM) {
            string_column(df, PLATFORM)?
                .into_iter()
                .filter(|p| !p.is_empty())
                .collect::<BTreeSet<_>>()
                .len()
        } else {
            0
        };

        let mut regional_sales = Vec::with_capacity(REGIONAL_SALES.len());
        for column in REGIONAL_SALES {
            if has_column(df, column) {
                let sum: f64 = numeric_column_f64(df, column)?.into_iter().flatten().sum();
                regional_sales.push((column.to_string(), sum));
            }
        }

        Ok(Self {
            games: df.height(),
            total_sales,
            average_sales,
            platforms,
            regional_sales,
        })
    }
}

/// Columns shown in the top-selling listing, when present.
pub const TOP_GAMES_COLUMNS: [&str; 6] = [TITLE, PLATFORM, GENRE, PUBLISHER, TOTAL_SALES, CRITIC_SCORE];

/// The `n` best-selling rows by `total_sales`, ties kept in input order.
pub fn top_games(df: &DataFrame, n: usize) -> Result<DataFrame> {
    let sales = if has_column(df, TOTAL_SALES) {
        numeric_column_f64(df, TOTAL_SALES)?
    } else {
        vec![None; df.height()]
    };
    let mut order: Vec<usize> = (0..df.height()).collect();
    order.sort_by(|a, b| {
        let left = sales[*a].unwrap_or(f64::NEG_INFINITY);
        let right = sales[*b].unwrap_or(f64::NEG_INFINITY);
        right.total_cmp(&left)
    });
    order.truncate(n);

    let indices: Vec<IdxSize> = order.into_iter().map(|idx| idx as IdxSize).collect();
    let rows = df.take(&IdxCa::from_vec("rows".into(), indices))?;
    let columns: Vec<&str> = TOP_GAMES_COLUMNS
        .into_iter()
        .filter(|column| has_column(&rows, column))
        .collect();
    Ok(rows.select(columns)?)
}

/// Loaded artifacts for one output directory.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    output_dir: PathBuf,
    frames: BTreeMap<DashboardView, DataFrame>,
}

impl DashboardContext {
    /// Read the merged table and the dashboard views from `output_dir`.
    pub fn load(output_dir: &Path) -> Result<Self> {
        let mut frames = BTreeMap::new();
        for view in DashboardView::ALL {
            let name = view.file_name();
            let df = read_csv_table(&output_dir.join(&name)).map_err(|source| {
                OutputError::Read {
                    artifact: name.clone(),
                    source,
                }
            })?;
            debug!(view = %view, rows = df.height(), "dashboard frame loaded");
            frames.insert(view, df);
        }
        info!(output_dir = %output_dir.display(), "dashboard context ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            frames,
        })
    }

    /// Build a context from frames already in memory.
    pub fn from_frames(
        output_dir: impl Into<PathBuf>,
        frames: BTreeMap<DashboardView, DataFrame>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            frames,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn frame(&self, view: DashboardView) -> Option<&DataFrame> {
        self.frames.get(&view)
    }

    /// Distinct platform codes of the merged table, sorted.
    pub fn platforms(&self) -> Result<Vec<String>> {
        self.distinct(PLATFORM)
    }

    /// Distinct genres of the merged table, sorted.
    pub fn genres(&self) -> Result<Vec<String>> {
        self.distinct(GENRE)
    }

    /// Smallest and largest year in the merged table.
    pub fn year_bounds(&self) -> Result<Option<(i32, i32)>> {
        let Some(df) = self.frame(DashboardView::Merged) else {
            return Ok(None);
        };
        if !has_column(df, YEAR) {
            return Ok(None);
        }
        let years: Vec<i32> = numeric_column_i64(df, YEAR)?
            .into_iter()
            .flatten()
            .filter_map(|year| i32::try_from(year).ok())
            .collect();
        Ok(years.iter().min().copied().zip(years.iter().max().copied()))
    }

    fn distinct(&self, column: &str) -> Result<Vec<String>> {
        let Some(df) = self.frame(DashboardView::Merged) else {
            return Ok(Vec::new());
        };
        if !has_column(df, column) {
            return Ok(Vec::new());
        }
        let values: BTreeSet<String> = string_column(df, column)?
            .into_iter()
            .filter(|value| !value.is_empty())
            .collect();
        Ok(values.into_iter().collect())
    }

    /// Rows of `view` that pass every active filter.
    ///
    /// A year-range filter excludes rows without a year.
    pub fn filtered(&self, view: DashboardView, filter: &DashboardFilter) -> Result<DataFrame> {
        let df = self
            .frame(view)
            .ok_or_else(|| OutputError::DataFrame {
                message: format!("dashboard view {view} is not loaded"),
            })?;
        if filter.is_empty() {
            return Ok(df.clone());
        }

        let mut keep = vec![true; df.height()];
        if let Some(platform) = &filter.platform {
            restrict_text(df, PLATFORM, platform, &mut keep)?;
        }
        if let Some(genre) = &filter.genre {
            restrict_text(df, GENRE, genre, &mut keep)?;
        }
        if let Some((from, to)) = filter.year_range {
            let years = if has_column(df, YEAR) {
                numeric_column_i64(df, YEAR)?
            } else {
                vec![None; df.height()]
            };
            for (flag, year) in keep.iter_mut().zip(years) {
                *flag &= year.is_some_and(|y| (i64::from(from)..=i64::from(to)).contains(&y));
            }
        }
        Ok(filter_rows(df, &keep)?)
    }
}

fn restrict_text(df: &DataFrame, column: &str, wanted: &str, keep: &mut [bool]) -> Result<()> {
    if !has_column(df, column) {
        keep.iter_mut().for_each(|flag| *flag = false);
        return Ok(());
    }
    for (flag, value) in keep.iter_mut().zip(string_column(df, column)?) {
        *flag &= value == wanted;
    }
    Ok(())
}

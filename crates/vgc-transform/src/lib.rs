//! Cleaning, merging and segmentation of the chart tables.
//!
//! Every stage takes its input by reference and returns a new frame; loaded
//! tables are never modified in place.

pub mod charts;
pub mod data_utils;
pub mod datetime;
pub mod error;
pub mod merge;
pub mod registry;
pub mod segment;

pub use charts::{CleanedCharts, clean_charts, present_sales};
pub use datetime::{decade_for, parse_release_date};
pub use error::{Result, TransformError};
pub use merge::{MergedCharts, merge_tables};
pub use registry::{RegistryTables, normalize_registries, normalize_registry};
pub use segment::{SegmentedViews, segment, segment_mask};

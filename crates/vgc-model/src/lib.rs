//! Data model shared by every stage of the chart preprocessing pipeline.

pub mod dataset;
pub mod options;
pub mod schema;
pub mod segment;
pub mod summary;

pub use dataset::DatasetKind;
pub use options::{DuplicateKeyPolicy, LoadMode, ProcessingOptions};
pub use segment::SegmentKind;
pub use summary::{CleaningReport, JoinStageReport, SummaryStats, YearRange};

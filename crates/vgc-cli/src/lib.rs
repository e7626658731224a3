//! CLI library components for the chart preprocessing pipeline.

pub mod logging;
pub mod pipeline;
pub mod types;

//! Raw table ingestion for the chart preprocessing pipeline.
//!
//! Reads the chart, registry and geography CSV files into Polars frames with
//! every column typed as String. Loading runs under a [`LoadMode`]: discovery
//! keeps going past failing tables, build aborts on the first one.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use vgc_ingest::{default_sources, load_tables};
//! use vgc_model::LoadMode;
//!
//! let sources = default_sources(Path::new("data"));
//! let loaded = load_tables(&sources, LoadMode::Build)?;
//! ```
//!
//! [`LoadMode`]: vgc_model::LoadMode

mod csv;
mod error;
mod loader;
pub mod polars_utils;
mod profile;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use self::csv::{normalize_header, read_csv_headers, read_csv_table};

// === Loading ===
pub use loader::{LoadFailure, LoadedTables, TableSource, default_sources, load_tables};

// === Profiling ===
pub use profile::{ColumnProfile, TableProfile, profile_frame, profile_table};

pub use table::NamedTable;

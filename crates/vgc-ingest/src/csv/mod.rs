//! CSV reading utilities.

mod reader;

pub use reader::{normalize_header, read_csv_headers, read_csv_table};

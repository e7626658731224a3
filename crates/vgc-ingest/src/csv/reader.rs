//! CSV file reading with a single required header row.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Strip a UTF-8 BOM and surrounding whitespace from a header cell.
pub fn normalize_header(raw: &str) -> String {
    raw.strip_prefix('\u{feff}').unwrap_or(raw).trim().to_string()
}

/// Reads the header row of a CSV file.
///
/// Fails on an empty file, an empty column name, or a duplicated name.
pub fn read_csv_headers(path: &Path) -> Result<Vec<String>> {
    let file = open(path)?;
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut record = ::csv::StringRecord::new();
    let has_row = reader
        .read_record(&mut record)
        .map_err(|source| IngestError::Header {
            path: path.to_path_buf(),
            source,
        })?;
    if !has_row {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let columns: Vec<String> = record.iter().map(normalize_header).collect();
    if columns.iter().all(String::is_empty) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let mut seen = BTreeSet::new();
    for (idx, column) in columns.iter().enumerate() {
        if column.is_empty() {
            return Err(IngestError::InvalidHeader {
                path: path.to_path_buf(),
                reason: format!("column {} has no name", idx + 1),
            });
        }
        if !seen.insert(column.as_str()) {
            return Err(IngestError::InvalidHeader {
                path: path.to_path_buf(),
                reason: format!("duplicate column name {column}"),
            });
        }
    }
    Ok(columns)
}

/// Reads a CSV file into a DataFrame with every column typed as String.
///
/// Type coercion belongs to the cleaning stage, so no schema inference
/// happens here. Column names are normalized the same way as
/// [`read_csv_headers`].
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    let headers = read_csv_headers(path)?;

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() != headers.len() {
        return Err(IngestError::CsvParse {
            path: path.to_path_buf(),
            message: format!(
                "expected {} columns from header, parsed {}",
                headers.len(),
                df.width()
            ),
        });
    }

    let parsed: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for (current, wanted) in parsed.iter().zip(&headers) {
        if current != wanted {
            df.rename(current, wanted.as_str().into())?;
        }
    }

    Ok(df)
}

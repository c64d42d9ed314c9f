use crate::table::{Cell, RawTable};
use calamine::{Data, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Terminal failure to obtain a table from the input file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("unsupported file type {extension:?}: {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("cannot read workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("cannot read csv {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("workbook has no worksheet: {}", path.display())]
    NoWorksheet { path: PathBuf },

    #[error("no header row in {}", path.display())]
    NoHeader { path: PathBuf },
}

/// Read the first worksheet of a workbook, or a CSV file, into a RawTable.
///
/// The first row is the header row. The reader is chosen by extension.
pub fn load_table(path: &Path) -> Result<RawTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let table = match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path)?,
        "csv" => load_csv(path)?,
        _ => {
            return Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            });
        }
    };

    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.columns().len(),
        "loaded table"
    );
    Ok(table)
}

fn load_workbook(path: &Path) -> Result<RawTable, LoadError> {
    let workbook_err = |source| LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(workbook_err)?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| LoadError::NoHeader {
            path: path.to_path_buf(),
        })?
        .iter()
        .map(|c| c.to_string())
        .collect();

    let records = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Ok(RawTable::from_rows(headers, records))
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) if f.is_finite() => Cell::Number(*f),
        Data::Float(_) => Cell::Missing,
        Data::String(s) if s.trim().is_empty() => Cell::Missing,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Empty | Data::Error(_) => Cell::Missing,
        // Booleans and dates are categorical here, never summed.
        other => Cell::Text(other.to_string()),
    }
}

fn load_csv(path: &Path) -> Result<RawTable, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(LoadError::NoHeader {
            path: path.to_path_buf(),
        });
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        records.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(RawTable::from_rows(headers, records))
}

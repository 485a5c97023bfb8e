//! CSV table ingest and export.
//!
//! This module turns a heterogeneous catalog CSV into a clean `Dataset` that
//! is safe to filter.
//!
//! Design goals:
//!
//! - **Strict schema** for the four astrometric columns (clear errors, exit 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Opaque-column preservation**: whatever else the archive supplied is
//!   carried through untouched and written back on export

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Dataset, StarRecord};
use crate::error::AppError;

/// The columns the tool interprets, in their fixed export order.
const ASTROMETRIC_COLUMNS: [&str; 4] = ["ra", "dec", "pmra", "pmdec"];

/// A row skipped during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based line in the source file (the header is line 1).
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed rows plus per-row failures.
#[derive(Debug, Clone)]
pub struct TableRead {
    pub dataset: Dataset,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

/// Load a catalog table from a CSV file.
pub fn read_table(path: &Path) -> Result<TableRead, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open table '{}': {e}", path.display()))
    })?;
    parse_table(file)
}

/// Parse CSV from any reader (files, archive responses, tests).
pub fn parse_table(reader: impl Read) -> Result<TableRead, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let mut astrometric = [0usize; 4];
    for (slot, name) in astrometric.iter_mut().zip(ASTROMETRIC_COLUMNS) {
        *slot = *header_map.get(name).ok_or_else(|| {
            AppError::input(format!(
                "Missing required column '{name}' (need ra, dec, pmra, pmdec)."
            ))
        })?;
    }

    // Everything that is not astrometric is preserved verbatim.
    let extra_indices: Vec<usize> = (0..headers.len())
        .filter(|i| !astrometric.contains(i))
        .collect();
    let extra_columns: Vec<String> = extra_indices
        .iter()
        .map(|&i| headers[i].to_string())
        .collect();

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (i, row) in reader.records().enumerate() {
        rows_read += 1;
        let line = i + 2; // header occupies line 1
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("Unreadable row: {e}"),
                });
                continue;
            }
        };

        match parse_record(&row, &astrometric, &extra_indices) {
            Ok(record) => records.push(record),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    Ok(TableRead {
        dataset: Dataset::new(records, extra_columns),
        rows_read,
        row_errors,
    })
}

fn parse_record(
    row: &StringRecord,
    astrometric: &[usize; 4],
    extra_indices: &[usize],
) -> Result<StarRecord, String> {
    let mut values = [0.0f64; 4];
    for (value, (&idx, name)) in values
        .iter_mut()
        .zip(astrometric.iter().zip(ASTROMETRIC_COLUMNS))
    {
        let raw = row.get(idx).unwrap_or("");
        if raw.is_empty() {
            return Err(format!("Missing {name} value."));
        }
        *value = raw
            .parse::<f64>()
            .map_err(|_| format!("Invalid {name} value '{raw}'."))?;
        if !value.is_finite() {
            return Err(format!("Non-finite {name} value '{raw}'."));
        }
    }

    let extras = extra_indices
        .iter()
        .map(|&idx| row.get(idx).unwrap_or("").to_string())
        .collect();

    Ok(StarRecord {
        ra: values[0],
        dec: values[1],
        pmra: values[2],
        pmdec: values[3],
        extras,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect()
}

/// Write a dataset back to CSV, astrometric columns first, opaque columns
/// after in their original order.
pub fn write_table(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create table '{}': {e}", path.display()))
    })?;
    write_table_to(file, dataset)
}

fn write_table_to(writer: impl Write, dataset: &Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);

    let header: Vec<&str> = ASTROMETRIC_COLUMNS
        .iter()
        .copied()
        .chain(dataset.extra_columns.iter().map(String::as_str))
        .collect();
    writer
        .write_record(&header)
        .map_err(|e| AppError::input(format!("Failed to write table header: {e}")))?;

    for record in &dataset.records {
        let mut row: Vec<String> = vec![
            record.ra.to_string(),
            record.dec.to_string(),
            record.pmra.to_string(),
            record.pmdec.to_string(),
        ];
        row.extend(record.extras.iter().cloned());
        writer
            .write_record(&row)
            .map_err(|e| AppError::input(format!("Failed to write table row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush table: {e}")))
}

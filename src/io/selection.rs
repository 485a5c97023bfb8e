//! Read/write accepted-selection JSON.
//!
//! Selection JSON is the portable record of a finished refinement run:
//!
//! - the chosen ellipse and its inside-count
//! - the survival percentage against the source table
//! - the search grid that produced it
//!
//! The schema is defined by `domain::SelectionFile`.

use std::fs::File;
use std::path::Path;

use chrono::Local;

use crate::domain::{ScoredEllipse, SearchGrid, SelectionFile};
use crate::error::AppError;
use crate::report::survival_percent;

/// Write a selection JSON file.
pub fn write_selection_json(
    path: &Path,
    best: &ScoredEllipse,
    total_count: usize,
    grid: &SearchGrid,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create selection JSON '{}': {e}",
            path.display()
        ))
    })?;

    let selection = SelectionFile {
        tool: "astrogaia".to_string(),
        date: Local::now().date_naive(),
        best: best.clone(),
        total_count,
        survival_percent: survival_percent(best.inside_count, total_count),
        grid: *grid,
    };

    serde_json::to_writer_pretty(file, &selection)
        .map_err(|e| AppError::input(format!("Failed to write selection JSON: {e}")))?;
    Ok(())
}

/// Read a selection JSON file.
pub fn read_selection_json(path: &Path) -> Result<SelectionFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!(
            "Failed to open selection JSON '{}': {e}",
            path.display()
        ))
    })?;
    let selection: SelectionFile = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid selection JSON: {e}")))?;
    Ok(selection)
}

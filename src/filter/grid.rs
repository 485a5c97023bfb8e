//! Search-grid construction and validation.
//!
//! Ranges are validated once, up front; everything downstream may assume
//! sorted endpoints, positive extents and in-range inclinations.

use crate::domain::{GridAxis, SearchGrid, SearchRange};
use crate::error::AppError;

/// Generate the range's evenly spaced sample points, endpoints inclusive.
///
/// A single step yields the minimum alone, so a 1×1×1 grid evaluates exactly
/// one candidate.
pub fn lin_space(range: &SearchRange) -> Vec<f64> {
    let steps = range.steps().max(1);
    if steps == 1 {
        return vec![range.min()];
    }
    let stride = (range.max() - range.min()) / (steps as f64 - 1.0);
    (0..steps).map(|i| range.min() + stride * i as f64).collect()
}

/// Build a `SearchRange` from the raw endpoint list given on the command line.
///
/// The list must carry exactly two values; they are sorted so the smaller
/// becomes the minimum.
pub fn range_from_endpoints(
    axis: GridAxis,
    raw: &[f64],
    steps: usize,
) -> Result<SearchRange, AppError> {
    if raw.len() != 2 {
        let example = match axis {
            GridAxis::Width | GridAxis::Height => "0.5,4",
            GridAxis::Inclination => "-45,45",
        };
        return Err(AppError::input(format!(
            "Expected exactly two {} endpoints, got {} ({raw:?}). Example: --{} {example}",
            axis.label(),
            raw.len(),
            axis.label(),
        )));
    }
    if steps == 0 {
        return Err(AppError::input(format!(
            "{} steps must be at least 1.",
            axis.label()
        )));
    }
    Ok(SearchRange::new(raw[0], raw[1], steps))
}

/// Validate a full (width, height, inclination) grid before any sweep starts.
pub fn validate_grid(
    width: SearchRange,
    height: SearchRange,
    inclination: SearchRange,
) -> Result<SearchGrid, AppError> {
    for (axis, range) in [(GridAxis::Width, width), (GridAxis::Height, height)] {
        if !(range.min().is_finite() && range.max().is_finite() && range.min() > 0.0) {
            return Err(AppError::input(format!(
                "All {} values must be strictly positive, got [{}, {}]. Example: --{} 0.5,4",
                axis.label(),
                range.min(),
                range.max(),
                axis.label(),
            )));
        }
        if range.steps() == 0 {
            return Err(AppError::input(format!(
                "{} steps must be at least 1.",
                axis.label()
            )));
        }
    }
    if !(inclination.min().is_finite() && inclination.max().is_finite()) {
        return Err(AppError::input("Inclination endpoints must be finite."));
    }
    if inclination.min() < -90.0 || inclination.max() > 90.0 {
        return Err(AppError::input(format!(
            "Inclination must lie within [-90, 90] degrees, got [{}, {}].",
            inclination.min(),
            inclination.max(),
        )));
    }
    if inclination.steps() == 0 {
        return Err(AppError::input("inclination steps must be at least 1."));
    }
    Ok(SearchGrid {
        width,
        height,
        inclination,
    })
}

//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during filtering
//! - exported to CSV/JSON
//! - reloaded later for plotting or comparisons

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Angular unit for user-supplied search radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RadiusUnit {
    Degrees,
    Arcmin,
    Arcsec,
}

impl RadiusUnit {
    /// Convert a radius expressed in this unit to degrees.
    pub fn to_degrees(self, value: f64) -> f64 {
        match self {
            RadiusUnit::Degrees => value,
            RadiusUnit::Arcmin => value / 60.0,
            RadiusUnit::Arcsec => value / 3600.0,
        }
    }
}

/// Kinematic filtering method selected on the CLI.
///
/// `Cordoni` (iterative sigma clipping) is accepted by the parser for
/// compatibility with the original tool but is not implemented in this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterMethod {
    Vpd,
    Cordoni,
}

/// Which coordinate plane an ASCII scatter shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    /// Sky positions (`ra` vs `dec`), degrees.
    Sky,
    /// Vector Point Diagram (`pmra` vs `pmdec`), mas/yr.
    Vpd,
}

/// A position on the celestial sphere (ICRS), in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPoint {
    pub ra: f64,
    pub dec: f64,
}

/// One catalog row.
///
/// The four astrometric columns are the only ones the tool interprets;
/// everything else the input table carried is preserved verbatim in `extras`
/// and written back on export. Records are never mutated after ingest.
#[derive(Debug, Clone)]
pub struct StarRecord {
    /// Right ascension, degrees.
    pub ra: f64,
    /// Declination, degrees.
    pub dec: f64,
    /// Proper motion in right ascension (μα·cosδ), mas/yr.
    pub pmra: f64,
    /// Proper motion in declination, mas/yr.
    pub pmdec: f64,
    /// Opaque column values, aligned with `Dataset::extra_columns`.
    pub extras: Vec<String>,
}

impl StarRecord {
    pub fn position(&self) -> SkyPoint {
        SkyPoint {
            ra: self.ra,
            dec: self.dec,
        }
    }

    /// The record projected onto the proper-motion plane.
    pub fn vpd(&self) -> (f64, f64) {
        (self.pmra, self.pmdec)
    }
}

/// An ordered, indexable star table.
///
/// Filtering never mutates a dataset; it produces a fresh one, so repeated
/// refinement passes always start from pristine data.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<StarRecord>,
    /// Header names for `StarRecord::extras`, in column order.
    pub extra_columns: Vec<String>,
}

impl Dataset {
    pub fn new(records: Vec<StarRecord>, extra_columns: Vec<String>) -> Self {
        Self {
            records,
            extra_columns,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A per-record boolean selection, same length as the table it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask(Vec<bool>);

impl Mask {
    pub fn new(values: Vec<bool>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[bool] {
        &self.0
    }

    /// Number of records the mask keeps.
    pub fn count_kept(&self) -> usize {
        self.0.iter().filter(|&&keep| keep).count()
    }

    /// Fail unless the mask lines up with a table of `expected` rows.
    ///
    /// A mismatch means some collaborator (or the core itself) silently
    /// truncated or corrupted data, so it is fatal rather than padded or
    /// clipped.
    pub fn ensure_len(&self, expected: usize) -> Result<(), AppError> {
        if self.0.len() != expected {
            return Err(AppError::invariant(format!(
                "Mask length {} does not match table length {expected}.",
                self.0.len()
            )));
        }
        Ok(())
    }
}

/// Categorical membership tag parallel to a mask; consumed by plotting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipTag {
    Member,
    Field,
}

/// A membership ellipse in the proper-motion plane.
///
/// `width` and `height` are full extents (mas/yr); the containment test
/// divides them by two. `inclination` is measured from the +Y axis,
/// counter-clockwise, in degrees within `[-90, 90]` (astronomical
/// position-angle convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    pub inclination: f64,
}

/// The winning candidate of a grid sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEllipse {
    pub ellipse: Ellipse,
    pub inside_count: usize,
}

/// An inclusive parameter range sampled at `steps` evenly spaced values.
///
/// Endpoints are sorted on construction, so downstream code may assume
/// `min <= max` unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchRange {
    min: f64,
    max: f64,
    steps: usize,
}

impl SearchRange {
    /// Build a range from two endpoints given in either order.
    pub fn new(a: f64, b: f64, steps: usize) -> Self {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Self { min, max, steps }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

/// Axis of the search grid, used when revising ranges interactively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    Width,
    Height,
    Inclination,
}

impl GridAxis {
    pub const ALL: [GridAxis; 3] = [GridAxis::Width, GridAxis::Height, GridAxis::Inclination];

    /// Human-readable label, doubling as the CLI flag name.
    pub fn label(self) -> &'static str {
        match self {
            GridAxis::Width => "width",
            GridAxis::Height => "height",
            GridAxis::Inclination => "inclination",
        }
    }
}

/// The validated search grid.
///
/// This is the immutable configuration value produced once by validation and
/// threaded through the sweep; every update builds a new grid rather than
/// mutating in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchGrid {
    pub width: SearchRange,
    pub height: SearchRange,
    pub inclination: SearchRange,
}

impl SearchGrid {
    pub fn axis(&self, axis: GridAxis) -> SearchRange {
        match axis {
            GridAxis::Width => self.width,
            GridAxis::Height => self.height,
            GridAxis::Inclination => self.inclination,
        }
    }

    pub fn with_axis(&self, axis: GridAxis, range: SearchRange) -> SearchGrid {
        let mut next = *self;
        match axis {
            GridAxis::Width => next.width = range,
            GridAxis::Height => next.height = range,
            GridAxis::Inclination => next.inclination = range,
        }
        next
    }

    /// Total candidate count of the sweep, degenerate circles included.
    pub fn candidate_count(&self) -> usize {
        self.width.steps() * self.height.steps() * self.inclination.steps()
    }
}

/// A saved selection file (JSON): the portable record of an accepted run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionFile {
    pub tool: String,
    pub date: NaiveDate,
    pub best: ScoredEllipse,
    pub total_count: usize,
    pub survival_percent: f64,
    pub grid: SearchGrid,
}

//! Command-line parsing for the Gaia membership-filtering tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the geometry/search code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use regex::Regex;

use crate::domain::{FilterMethod, PlotKind, RadiusUnit};
use crate::error::AppError;

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "astrogaia",
    version,
    about = "Gaia DR3 membership-filtering tool ⭐ — cone/ring extraction and interactive VPD selection"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract data from the Gaia archive.
    #[command(subcommand)]
    Extract(ExtractCommand),
    /// Filter a local table by kinematic membership (interactive).
    Filter(FilterArgs),
    /// Render an ASCII scatter of a local table.
    Plot(PlotArgs),
    /// Generate a synthetic star field with a cluster overdensity.
    Sample(SampleArgs),
}

#[derive(Debug, Subcommand)]
pub enum ExtractCommand {
    /// Raw cone search: everything within a radius of the center.
    Raw(ExtractRawArgs),
    /// Ring search: an outer cone minus an inner exclusion disk.
    Ring(ExtractRingArgs),
}

/// Where the search is centered: a resolvable name, or explicit coordinates.
#[derive(Debug, Args, Clone)]
pub struct CenterArgs {
    /// Object name to resolve (e.g. "NGC 104").
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Right ascension (J2000) of the center, degrees.
    #[arg(long)]
    pub ra: Option<f64>,

    /// Declination (J2000) of the center, degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub dec: Option<f64>,
}

#[derive(Debug, Args)]
pub struct ExtractRawArgs {
    #[command(flatten)]
    pub center: CenterArgs,

    /// Search radius, in `--unit`.
    #[arg(short = 'r', long)]
    pub radius: f64,

    /// Unit for radii.
    #[arg(short = 'u', long, value_enum, default_value_t = RadiusUnit::Arcmin)]
    pub unit: RadiusUnit,

    /// Maximum number of rows requested from the archive.
    #[arg(long, default_value_t = 100_000)]
    pub limit: usize,

    /// Output CSV path.
    #[arg(short = 'o', long)]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExtractRingArgs {
    #[command(flatten)]
    pub center: CenterArgs,

    /// Outer cone radius, in `--unit`.
    #[arg(long)]
    pub outer: f64,

    /// Inner exclusion radius, in `--unit`.
    #[arg(long)]
    pub inner: f64,

    /// Unit for radii.
    #[arg(short = 'u', long, value_enum, default_value_t = RadiusUnit::Arcmin)]
    pub unit: RadiusUnit,

    /// Maximum number of rows requested from the archive.
    #[arg(long, default_value_t = 100_000)]
    pub limit: usize,

    /// Output CSV path.
    #[arg(short = 'o', long)]
    pub output: PathBuf,
}

/// Options for the interactive membership filter.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Input table (CSV with ra, dec, pmra, pmdec columns).
    #[arg(short = 'f', long)]
    pub file: PathBuf,

    /// Filtering method.
    #[arg(long, value_enum, default_value_t = FilterMethod::Vpd)]
    pub method: FilterMethod,

    /// Ellipse center in pmra, mas/yr (defaults to the table median).
    #[arg(long, allow_negative_numbers = true)]
    pub pmra: Option<f64>,

    /// Ellipse center in pmdec, mas/yr (defaults to the table median).
    #[arg(long, allow_negative_numbers = true)]
    pub pmdec: Option<f64>,

    /// Width endpoints (full extent, mas/yr).
    #[arg(long, value_delimiter = ',', default_values_t = vec![0.5, 4.0])]
    pub width: Vec<f64>,

    /// Height endpoints (full extent, mas/yr).
    #[arg(long, value_delimiter = ',', default_values_t = vec![0.5, 4.0])]
    pub height: Vec<f64>,

    /// Inclination endpoints, degrees in [-90, 90].
    ///
    /// Hyphen values stay allowed so comma lists like `-45,45` parse.
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = vec![-90.0, 90.0],
        allow_hyphen_values = true
    )]
    pub inclination: Vec<f64>,

    /// Grid steps along the width axis.
    #[arg(long, default_value_t = 15)]
    pub width_steps: usize,

    /// Grid steps along the height axis.
    #[arg(long, default_value_t = 15)]
    pub height_steps: usize,

    /// Grid steps along the inclination axis.
    #[arg(long, default_value_t = 19)]
    pub inclination_steps: usize,

    /// Output CSV path for the filtered table.
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Also save the accepted ellipse and counts as JSON.
    #[arg(long)]
    pub save_selection: Option<PathBuf>,

    /// Plot width (columns) for the review scatter.
    #[arg(long, default_value_t = 100)]
    pub plot_width: usize,

    /// Plot height (rows) for the review scatter.
    #[arg(long, default_value_t = 30)]
    pub plot_height: usize,
}

/// Options for plotting a saved table.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Input table (CSV with ra, dec, pmra, pmdec columns).
    #[arg(short = 'f', long)]
    pub file: PathBuf,

    /// Which plane to draw.
    #[arg(long, value_enum, default_value_t = PlotKind::Vpd)]
    pub kind: PlotKind,

    /// Overlay a saved selection (JSON) on a VPD plot.
    #[arg(long)]
    pub selection: Option<PathBuf>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 30)]
    pub height: usize,
}

/// Options for synthetic sample generation.
#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Field center right ascension, degrees.
    #[arg(long, default_value_t = 10.0)]
    pub ra: f64,

    /// Field center declination, degrees.
    #[arg(long, default_value_t = -20.0, allow_negative_numbers = true)]
    pub dec: f64,

    /// Field radius, in `--unit`.
    #[arg(short = 'r', long, default_value_t = 30.0)]
    pub radius: f64,

    /// Unit for the field radius.
    #[arg(short = 'u', long, value_enum, default_value_t = RadiusUnit::Arcmin)]
    pub unit: RadiusUnit,

    /// Number of field stars.
    #[arg(long, default_value_t = 800)]
    pub n_field: usize,

    /// Number of cluster stars.
    #[arg(long, default_value_t = 200)]
    pub n_cluster: usize,

    /// Cluster proper-motion centroid in pmra, mas/yr.
    #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
    pub pmra: f64,

    /// Cluster proper-motion centroid in pmdec, mas/yr.
    #[arg(long, default_value_t = -2.5, allow_negative_numbers = true)]
    pub pmdec: f64,

    /// Cluster internal dispersion, mas/yr.
    #[arg(long, default_value_t = 0.25)]
    pub dispersion: f64,

    /// Field proper-motion spread, mas/yr.
    #[arg(long, default_value_t = 5.0)]
    pub spread: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Validate an object name the way the original archive tool did: word
/// characters and spaces only, with spaces normalized to underscores for
/// file-friendly use.
pub fn normalize_object_name(name: &str) -> Result<String, AppError> {
    let pattern = Regex::new(r"^[\w ]+$")
        .map_err(|e| AppError::invariant(format!("Invalid name pattern: {e}")))?;
    if !pattern.is_match(name) {
        return Err(AppError::input(format!(
            "Invalid object name '{name}' (letters, digits, underscores and spaces only)."
        )));
    }
    Ok(name.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn object_names_normalize_spaces() {
        assert_eq!(normalize_object_name("NGC 104").unwrap(), "NGC_104");
        assert_eq!(normalize_object_name("my_sample").unwrap(), "my_sample");
    }

    #[test]
    fn hostile_object_names_are_rejected() {
        let err = normalize_object_name("<NGC104>").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("<NGC104>"));
    }

    #[test]
    fn filter_defaults_parse() {
        let cli = Cli::try_parse_from([
            "astrogaia", "filter", "-f", "stars.csv", "-o", "members.csv",
        ])
        .unwrap();
        let Command::Filter(args) = cli.command else {
            panic!("expected filter command");
        };
        assert_eq!(args.width, vec![0.5, 4.0]);
        assert_eq!(args.inclination, vec![-90.0, 90.0]);
        assert_eq!(args.inclination_steps, 19);
        assert!(matches!(args.method, FilterMethod::Vpd));
    }

    #[test]
    fn comma_separated_endpoints_parse_including_negatives() {
        let cli = Cli::try_parse_from([
            "astrogaia",
            "filter",
            "-f",
            "stars.csv",
            "-o",
            "members.csv",
            "--width",
            "8,2",
            "--inclination",
            "-45,45",
        ])
        .unwrap();
        let Command::Filter(args) = cli.command else {
            panic!("expected filter command");
        };
        assert_eq!(args.width, vec![8.0, 2.0]);
        assert_eq!(args.inclination, vec![-45.0, 45.0]);
    }
}

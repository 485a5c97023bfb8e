//! ASCII/Unicode scatter plots for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//!
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//!
//! - field stars: `.`
//! - members: `*`
//! - ellipse boundary: `o`

use crate::domain::{Dataset, Ellipse, MembershipTag};
use crate::error::AppError;

/// Points sampled along the ellipse boundary for the overlay.
const BOUNDARY_SAMPLES: usize = 256;

/// Render the proper-motion plane, with optional membership classes and an
/// optional ellipse-boundary overlay.
pub fn render_vpd_scatter(
    dataset: &Dataset,
    tags: Option<&[MembershipTag]>,
    ellipse: Option<&Ellipse>,
    width: usize,
    height: usize,
) -> Result<String, AppError> {
    let points: Vec<(f64, f64)> = dataset.records.iter().map(|r| r.vpd()).collect();
    if let Some(tags) = tags {
        if tags.len() != points.len() {
            return Err(AppError::invariant(format!(
                "Tag list length {} does not match table length {}.",
                tags.len(),
                points.len()
            )));
        }
    }
    let overlay = ellipse.map(boundary_points);
    render_scatter(
        "VPD",
        ("pmra [mas/yr]", "pmdec [mas/yr]"),
        &points,
        tags,
        overlay.as_deref(),
        width,
        height,
    )
}

/// Render sky positions (`ra` vs `dec`).
pub fn render_sky_scatter(
    dataset: &Dataset,
    width: usize,
    height: usize,
) -> Result<String, AppError> {
    let points: Vec<(f64, f64)> = dataset
        .records
        .iter()
        .map(|r| (r.ra, r.dec))
        .collect();
    render_scatter(
        "Sky",
        ("ra [deg]", "dec [deg]"),
        &points,
        None,
        None,
        width,
        height,
    )
}

fn render_scatter(
    title: &str,
    axis_labels: (&str, &str),
    points: &[(f64, f64)],
    tags: Option<&[MembershipTag]>,
    overlay: Option<&[(f64, f64)]>,
    width: usize,
    height: usize,
) -> Result<String, AppError> {
    if points.is_empty() && overlay.is_none() {
        return Err(AppError::no_data("Nothing to plot."));
    }
    let width = width.max(10);
    let height = height.max(5);

    let all = points.iter().chain(overlay.into_iter().flatten());
    let (x_min, x_max, y_min, y_max) = padded_ranges(all)?;

    let mut grid = vec![vec![' '; width]; height];

    // Boundary first, so points can overlay it.
    if let Some(overlay) = overlay {
        for &(x, y) in overlay {
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            grid[row][col] = 'o';
        }
    }

    for (i, &(x, y)) in points.iter().enumerate() {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        let ch = match tags.map(|t| t[i]) {
            Some(MembershipTag::Member) => '*',
            Some(MembershipTag::Field) | None => '.',
        };
        grid[row][col] = ch;
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{title}: {}=[{x_min:.3}, {x_max:.3}] | {}=[{y_min:.3}, {y_max:.3}]\n",
        axis_labels.0, axis_labels.1
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    Ok(out)
}

/// Sample the boundary of a (possibly inclined) ellipse.
///
/// The parametric point `(a·cosφ, b·sinφ)` is carried back through the
/// inverse of the frame rotation used by the containment test, so sampled
/// points evaluate to a radial coordinate of exactly one.
fn boundary_points(ellipse: &Ellipse) -> Vec<(f64, f64)> {
    let a = ellipse.width / 2.0;
    let b = ellipse.height / 2.0;
    let theta = (180.0 - ellipse.inclination).to_radians();
    let (sin_t, cos_t) = theta.sin_cos();

    (0..BOUNDARY_SAMPLES)
        .map(|i| {
            let phi = i as f64 / BOUNDARY_SAMPLES as f64 * std::f64::consts::TAU;
            let (xe, ye) = (a * phi.cos(), b * phi.sin());
            (
                ellipse.center_x + xe * cos_t - ye * sin_t,
                ellipse.center_y + xe * sin_t + ye * cos_t,
            )
        })
        .collect()
}

fn padded_ranges<'a>(
    points: impl Iterator<Item = &'a (f64, f64)>,
) -> Result<(f64, f64, f64, f64), AppError> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
        return Err(AppError::invariant("Non-finite coordinates in plot data."));
    }
    let (x_min, x_max) = pad_range(x_min, x_max, 0.05);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    Ok((x_min, x_max, y_min, y_max))
}

fn pad_range(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span < 1e-12 { 0.5 } else { span * fraction };
    (min - pad, max + pad)
}

fn map_x(x: f64, min: f64, max: f64, width: usize) -> usize {
    let u = (x - min) / (max - min);
    ((u * (width as f64 - 1.0)).round() as usize).min(width - 1)
}

fn map_y(y: f64, min: f64, max: f64, height: usize) -> usize {
    // Terminal rows grow downward; flip so larger y draws higher.
    let u = (y - min) / (max - min);
    let row = ((1.0 - u) * (height as f64 - 1.0)).round() as usize;
    row.min(height - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StarRecord;
    use crate::math::radial_coordinate;

    fn dataset_from_pm(points: &[(f64, f64)]) -> Dataset {
        let records = points
            .iter()
            .map(|&(pmra, pmdec)| StarRecord {
                ra: pmra,
                dec: pmdec,
                pmra,
                pmdec,
                extras: Vec::new(),
            })
            .collect();
        Dataset::new(records, Vec::new())
    }

    #[test]
    fn scatter_output_is_deterministic_and_labelled() {
        let data = dataset_from_pm(&[(0.0, 0.0), (1.0, 1.0)]);
        let a = render_vpd_scatter(&data, None, None, 40, 10).unwrap();
        let b = render_vpd_scatter(&data, None, None, 40, 10).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("VPD: pmra"));
        assert_eq!(a.lines().count(), 11);
    }

    #[test]
    fn members_and_field_draw_with_distinct_glyphs() {
        let data = dataset_from_pm(&[(-1.0, 0.0), (1.0, 0.0)]);
        let tags = vec![MembershipTag::Member, MembershipTag::Field];
        let plot = render_vpd_scatter(&data, Some(&tags), None, 40, 10).unwrap();
        assert!(plot.contains('*'));
        assert!(plot.contains('.'));
    }

    #[test]
    fn ellipse_overlay_draws_its_boundary() {
        let data = dataset_from_pm(&[(0.0, 0.0)]);
        let ellipse = Ellipse {
            center_x: 0.0,
            center_y: 0.0,
            width: 4.0,
            height: 2.0,
            inclination: 30.0,
        };
        let plot = render_vpd_scatter(&data, None, Some(&ellipse), 60, 20).unwrap();
        assert!(plot.contains('o'));
    }

    #[test]
    fn boundary_samples_sit_on_the_containment_boundary() {
        let ellipse = Ellipse {
            center_x: 1.0,
            center_y: -2.0,
            width: 6.0,
            height: 2.5,
            inclination: -40.0,
        };
        for (x, y) in boundary_points(&ellipse) {
            let r = radial_coordinate(x, y, &ellipse);
            assert!((r - 1.0).abs() < 1e-9, "boundary sample drifted: {r}");
        }
    }

    #[test]
    fn tag_length_mismatch_is_fatal() {
        let data = dataset_from_pm(&[(0.0, 0.0), (1.0, 1.0)]);
        let tags = vec![MembershipTag::Member];
        let err = render_vpd_scatter(&data, Some(&tags), None, 40, 10).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn empty_tables_cannot_be_plotted() {
        let data = dataset_from_pm(&[]);
        let err = render_sky_scatter(&data, 40, 10).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}

//! Ellipse containment in the proper-motion plane.

use crate::domain::Ellipse;

/// Normalized radial coordinate of `(x, y)` with respect to an ellipse.
///
/// The point is translated into the ellipse frame, the frame is rotated by
/// `180° − inclination` (inclination measured from the +Y axis,
/// counter-clockwise), and the quadratic form
/// `(x'/(width/2))² + (y'/(height/2))²` is evaluated. Values `<= 1` lie
/// inside or on the boundary.
pub fn radial_coordinate(x: f64, y: f64, ellipse: &Ellipse) -> f64 {
    let dx = x - ellipse.center_x;
    let dy = y - ellipse.center_y;
    let theta = (180.0 - ellipse.inclination).to_radians();
    let (sin_t, cos_t) = theta.sin_cos();
    let xr = dx * cos_t + dy * sin_t;
    let yr = -dx * sin_t + dy * cos_t;
    let a = ellipse.width / 2.0;
    let b = ellipse.height / 2.0;
    (xr / a).powi(2) + (yr / b).powi(2)
}

/// Boundary-inclusive containment test.
pub fn contains(x: f64, y: f64, ellipse: &Ellipse) -> bool {
    radial_coordinate(x, y, ellipse) <= 1.0
}

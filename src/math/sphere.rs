//! Great-circle geometry on the unit sphere.

use nalgebra::Vector3;

use crate::domain::SkyPoint;

/// Cartesian unit vector for a sky position.
fn unit_vector(p: SkyPoint) -> Vector3<f64> {
    let ra = p.ra.to_radians();
    let dec = p.dec.to_radians();
    Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin())
}

/// Great-circle separation between two sky positions, in degrees.
///
/// Uses the vector form `atan2(|u×v|, u·v)`, which stays accurate both for
/// very small and for near-antipodal separations (a plain `acos` of the dot
/// product loses precision below roughly an arcsecond).
pub fn angular_separation_deg(a: SkyPoint, b: SkyPoint) -> f64 {
    let u = unit_vector(a);
    let v = unit_vector(b);
    u.cross(&v).norm().atan2(u.dot(&v)).to_degrees()
}

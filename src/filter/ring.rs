//! Annulus selection as a cone-search difference.
//!
//! The archive is only asked for the outer cone; the inner disk is removed
//! locally by masking on angular distance, so a ring costs a single query
//! instead of two.

use crate::domain::{Dataset, Mask, SkyPoint};
use crate::error::AppError;
use crate::math::angular_separation_deg;

/// Check the annulus precondition before any query executes.
///
/// Both radii must already be in degrees.
pub fn ensure_annulus(outer_deg: f64, inner_deg: f64) -> Result<(), AppError> {
    if !(outer_deg.is_finite() && inner_deg.is_finite() && outer_deg > 0.0 && inner_deg >= 0.0) {
        return Err(AppError::input(format!(
            "Ring radii must be finite and non-negative, got outer={outer_deg} deg, inner={inner_deg} deg."
        )));
    }
    if outer_deg <= inner_deg {
        return Err(AppError::input(format!(
            "Outer radius must exceed the inner radius, got outer={outer_deg} deg, \
             inner={inner_deg} deg. Example: --outer 10 --inner 5"
        )));
    }
    Ok(())
}

/// Mask out every record closer than `inner_deg` to `center`.
///
/// Records inside the excluded disk get `false`; everything at or beyond the
/// inner radius is kept. The mask always has one entry per record.
pub fn build_ring_mask(dataset: &Dataset, center: SkyPoint, inner_deg: f64) -> Mask {
    let values = dataset
        .records
        .iter()
        .map(|record| angular_separation_deg(record.position(), center) >= inner_deg)
        .collect();
    Mask::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StarRecord;
    use crate::filter::apply_mask;

    fn record_at(ra: f64, dec: f64) -> StarRecord {
        StarRecord {
            ra,
            dec,
            pmra: 0.0,
            pmdec: 0.0,
            extras: Vec::new(),
        }
    }

    /// Stars offset in declination sit at exactly that angular distance.
    fn dataset_with_offsets_arcmin(center: SkyPoint, offsets: &[f64]) -> Dataset {
        let records = offsets
            .iter()
            .map(|arcmin| record_at(center.ra, center.dec + arcmin / 60.0))
            .collect();
        Dataset::new(records, Vec::new())
    }

    #[test]
    fn annulus_precondition_requires_outer_beyond_inner() {
        assert!(ensure_annulus(10.0 / 60.0, 5.0 / 60.0).is_ok());
        let err = ensure_annulus(5.0 / 60.0, 10.0 / 60.0).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("exceed"));
    }

    #[test]
    fn inner_disk_is_excluded_and_the_ring_kept() {
        // Inner radius 5', outer 10', center (ra=10, dec=-20): a star 3' away
        // is dropped, a star 7' away survives.
        let center = SkyPoint { ra: 10.0, dec: -20.0 };
        let data = dataset_with_offsets_arcmin(center, &[3.0, 7.0]);
        let mask = build_ring_mask(&data, center, 5.0 / 60.0);
        assert_eq!(mask.values(), &[false, true]);
    }

    #[test]
    fn mask_length_always_matches_the_dataset() {
        let center = SkyPoint { ra: 120.0, dec: 15.0 };
        let data = dataset_with_offsets_arcmin(center, &[1.0, 2.0, 3.0, 4.0]);
        let mask = build_ring_mask(&data, center, 2.5 / 60.0);
        assert_eq!(mask.len(), data.len());
        assert!(mask.ensure_len(data.len()).is_ok());
    }

    #[test]
    fn ring_mask_is_idempotent() {
        let center = SkyPoint { ra: 10.0, dec: -20.0 };
        let data = dataset_with_offsets_arcmin(center, &[1.0, 4.0, 6.0, 9.0]);
        let first = build_ring_mask(&data, center, 5.0 / 60.0);
        let second = build_ring_mask(&data, center, 5.0 / 60.0);
        assert_eq!(first, second);
    }

    #[test]
    fn applying_the_ring_mask_filters_the_inner_disk() {
        let center = SkyPoint { ra: 10.0, dec: -20.0 };
        let data = dataset_with_offsets_arcmin(center, &[1.0, 4.0, 6.0, 9.0]);
        let mask = build_ring_mask(&data, center, 5.0 / 60.0);
        let ring = apply_mask(&data, &mask).unwrap();
        assert_eq!(ring.len(), 2);
        assert!(ring.records.iter().all(|r| {
            angular_separation_deg(r.position(), center) >= 5.0 / 60.0
        }));
    }
}

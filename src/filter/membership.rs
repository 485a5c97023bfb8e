//! Per-point evaluation of one candidate ellipse.

use crate::domain::{Dataset, Ellipse, Mask, MembershipTag};
use crate::math::{contains, radial_coordinate};

/// Classify every record of the proper-motion plane against `ellipse`.
///
/// Returns the boolean mask and a parallel categorical tag usable by
/// plotting, so rendering concerns never leak into the filter itself.
/// Containment is boundary inclusive.
pub fn classify_members(dataset: &Dataset, ellipse: &Ellipse) -> (Mask, Vec<MembershipTag>) {
    let mut values = Vec::with_capacity(dataset.len());
    let mut tags = Vec::with_capacity(dataset.len());
    for record in &dataset.records {
        let (x, y) = record.vpd();
        let inside = radial_coordinate(x, y, ellipse) <= 1.0;
        values.push(inside);
        tags.push(if inside {
            MembershipTag::Member
        } else {
            MembershipTag::Field
        });
    }
    (Mask::new(values), tags)
}

/// Inside-point count for one candidate: the sweep's scoring function.
pub fn count_members(dataset: &Dataset, ellipse: &Ellipse) -> usize {
    dataset
        .records
        .iter()
        .filter(|record| {
            let (x, y) = record.vpd();
            contains(x, y, ellipse)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StarRecord;

    fn dataset_from_pm(points: &[(f64, f64)]) -> Dataset {
        let records = points
            .iter()
            .map(|&(pmra, pmdec)| StarRecord {
                ra: 0.0,
                dec: 0.0,
                pmra,
                pmdec,
                extras: Vec::new(),
            })
            .collect();
        Dataset::new(records, Vec::new())
    }

    fn ellipse(width: f64, height: f64, inclination: f64) -> Ellipse {
        Ellipse {
            center_x: 0.0,
            center_y: 0.0,
            width,
            height,
            inclination,
        }
    }

    #[test]
    fn classification_produces_parallel_mask_and_tags() {
        let data = dataset_from_pm(&[(4.0, 0.0), (6.0, 0.0), (5.0, 0.0)]);
        let (mask, tags) = classify_members(&data, &ellipse(10.0, 6.0, 0.0));
        assert_eq!(mask.len(), data.len());
        assert_eq!(tags.len(), data.len());
        assert_eq!(mask.values(), &[true, false, true]);
        assert_eq!(
            tags,
            vec![
                MembershipTag::Member,
                MembershipTag::Field,
                MembershipTag::Member
            ]
        );
    }

    #[test]
    fn count_agrees_with_the_mask() {
        let data = dataset_from_pm(&[(0.0, 0.0), (4.0, 0.0), (0.0, 2.9), (9.0, 9.0)]);
        let e = ellipse(10.0, 6.0, 0.0);
        let (mask, _) = classify_members(&data, &e);
        assert_eq!(count_members(&data, &e), mask.count_kept());
        assert_eq!(count_members(&data, &e), 3);
    }
}

//! Membership filtering: ring masks, ellipse search, refinement.
//!
//! Responsibilities:
//!
//! - turn an outer-cone result into an annulus by local masking (`ring`)
//! - score candidate ellipses in the proper-motion plane (`membership`)
//! - sweep the (width, height, inclination) grid (`search`)
//! - drive the interactive refine cycle (`refine`)

pub mod grid;
pub mod membership;
pub mod refine;
pub mod ring;
pub mod search;

pub use grid::*;
pub use membership::*;
pub use refine::*;
pub use ring::*;
pub use search::*;

use crate::domain::{Dataset, Mask};
use crate::error::AppError;

/// Produce a filtered copy of `dataset` holding the rows the mask keeps.
///
/// The mask must line up with the dataset row-for-row; a length mismatch is
/// a fatal invariant violation, never silently truncated or padded. The
/// original dataset is left untouched.
pub fn apply_mask(dataset: &Dataset, mask: &Mask) -> Result<Dataset, AppError> {
    mask.ensure_len(dataset.len())?;
    let records = dataset
        .records
        .iter()
        .zip(mask.values())
        .filter(|&(_, &keep)| keep)
        .map(|(record, _)| record.clone())
        .collect();
    Ok(Dataset::new(records, dataset.extra_columns.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StarRecord;

    fn dataset(n: usize) -> Dataset {
        let records = (0..n)
            .map(|i| StarRecord {
                ra: i as f64,
                dec: 0.0,
                pmra: 0.0,
                pmdec: 0.0,
                extras: vec![format!("star-{i}")],
            })
            .collect();
        Dataset::new(records, vec!["source_id".to_string()])
    }

    #[test]
    fn apply_mask_keeps_only_selected_rows() {
        let data = dataset(3);
        let mask = Mask::new(vec![true, false, true]);
        let filtered = apply_mask(&data, &mask).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.records[1].ra, 2.0);
        assert_eq!(filtered.records[1].extras[0], "star-2");
        // Copy-on-filter: the source table is untouched.
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn apply_mask_rejects_length_mismatch() {
        let data = dataset(3);
        let mask = Mask::new(vec![true, false]);
        let err = apply_mask(&data, &mask).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}

//! Exhaustive ellipse grid sweep.
//!
//! Why brute force?
//!
//! - the objective (integer inside-count) is discontinuous and multi-modal,
//!   so gradient methods have nothing to hold on to
//! - it is deterministic given the same inputs
//! - candidate evaluations are independent, so the sweep parallelizes freely

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::domain::{Dataset, Ellipse, ScoredEllipse, SearchGrid};
use crate::error::AppError;
use crate::filter::grid::lin_space;
use crate::filter::membership::count_members;

/// Observer for sweep progress. Called from worker threads.
pub trait SweepProgress: Sync {
    fn on_evaluated(&self, done: usize, total: usize);
}

/// Progress sink that reports nothing.
pub struct SilentProgress;

impl SweepProgress for SilentProgress {
    fn on_evaluated(&self, _done: usize, _total: usize) {}
}

/// Sweep statistics alongside the winning candidate.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    pub best: ScoredEllipse,
    /// Candidates actually scored.
    pub evaluated: usize,
    /// Candidates skipped because `width == height`.
    pub skipped_degenerate: usize,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    idx: usize,
    width: f64,
    height: f64,
    inclination: f64,
    inside: usize,
}

/// Find the grid candidate enclosing the most proper-motion points.
///
/// Candidates are indexed width-major, then height, then inclination. A
/// candidate replaces the current best only on a strictly greater count;
/// equal counts keep the smallest index, so the parallel reduction
/// reproduces the sequential first-found rule exactly.
///
/// Candidates with `width == height` are skipped: a circle has no meaningful
/// inclination, and kinematic selections are expected to be genuinely
/// stretched. The comparison is exact on purpose; degenerate circles only
/// arise when the two ranges emit identical extents.
pub fn search_best_ellipse(
    dataset: &Dataset,
    center: (f64, f64),
    grid: &SearchGrid,
    progress: &dyn SweepProgress,
) -> Result<SweepOutcome, AppError> {
    let widths = lin_space(&grid.width);
    let heights = lin_space(&grid.height);
    let inclinations = lin_space(&grid.inclination);
    let total = widths.len() * heights.len() * inclinations.len();

    let done = AtomicUsize::new(0);
    let candidates: Vec<Candidate> = (0..total)
        .into_par_iter()
        .filter_map(|idx| {
            let ia = idx % inclinations.len();
            let ih = (idx / inclinations.len()) % heights.len();
            let iw = idx / (inclinations.len() * heights.len());
            let (width, height, inclination) = (widths[iw], heights[ih], inclinations[ia]);

            let evaluated = done.fetch_add(1, Ordering::Relaxed) + 1;
            progress.on_evaluated(evaluated, total);

            if width == height {
                return None;
            }
            let ellipse = Ellipse {
                center_x: center.0,
                center_y: center.1,
                width,
                height,
                inclination,
            };
            Some(Candidate {
                idx,
                width,
                height,
                inclination,
                inside: count_members(dataset, &ellipse),
            })
        })
        .collect();

    let skipped_degenerate = total - candidates.len();
    let Some(first) = candidates.first().copied() else {
        return Err(AppError::no_data(
            "Every grid candidate was a circle (width == height); choose width and height \
             ranges whose sample points differ.",
        ));
    };

    // Deterministic selection: maximum inside-count, ties broken by the
    // earliest width-major grid index.
    let mut best = first;
    for c in &candidates[1..] {
        if c.inside > best.inside || (c.inside == best.inside && c.idx < best.idx) {
            best = *c;
        }
    }

    Ok(SweepOutcome {
        best: ScoredEllipse {
            ellipse: Ellipse {
                center_x: center.0,
                center_y: center.1,
                width: best.width,
                height: best.height,
                inclination: best.inclination,
            },
            inside_count: best.inside,
        },
        evaluated: candidates.len(),
        skipped_degenerate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SearchRange, StarRecord};

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

    fn grid(
        width: (f64, f64, usize),
        height: (f64, f64, usize),
        inclination: (f64, f64, usize),
    ) -> SearchGrid {
        SearchGrid {
            width: SearchRange::new(width.0, width.1, width.2),
            height: SearchRange::new(height.0, height.1, height.2),
            inclination: SearchRange::new(inclination.0, inclination.1, inclination.2),
        }
    }

    #[test]
    fn single_step_ranges_evaluate_exactly_one_candidate() {
        let data = dataset_from_pm(&[(0.0, 0.0), (1.0, 0.0)]);
        let g = grid((4.0, 4.0, 1), (2.0, 2.0, 1), (0.0, 0.0, 1));
        let outcome = search_best_ellipse(&data, (0.0, 0.0), &g, &SilentProgress).unwrap();
        assert_eq!(outcome.evaluated, 1);
        assert_eq!(outcome.skipped_degenerate, 0);
        assert_eq!(outcome.best.ellipse.width, 4.0);
        assert_eq!(outcome.best.ellipse.height, 2.0);
        assert_eq!(outcome.best.inside_count, 2);
    }

    #[test]
    fn ties_keep_the_earliest_width_major_candidate() {
        // No points at all: every candidate scores zero, so the winner must
        // be the first grid point in width-major order.
        let data = dataset_from_pm(&[]);
        let g = grid((5.0, 10.0, 2), (2.0, 3.0, 2), (0.0, 45.0, 2));
        let outcome = search_best_ellipse(&data, (0.0, 0.0), &g, &SilentProgress).unwrap();
        assert_eq!(outcome.best.inside_count, 0);
        assert_eq!(outcome.best.ellipse.width, 5.0);
        assert_eq!(outcome.best.ellipse.height, 2.0);
        assert_eq!(outcome.best.ellipse.inclination, 0.0);
    }

    #[test]
    fn degenerate_circles_never_win_even_at_maximal_count() {
        // Two stars on the x axis fit in the 2x2 circle but not in the thin
        // 0.5x2 ellipse. The circle is skipped, so the thin ellipse wins with
        // zero members.
        let data = dataset_from_pm(&[(0.8, 0.0), (-0.8, 0.0)]);
        let g = grid((0.5, 2.0, 2), (2.0, 2.0, 1), (0.0, 0.0, 1));
        let outcome = search_best_ellipse(&data, (0.0, 0.0), &g, &SilentProgress).unwrap();
        assert_eq!(outcome.skipped_degenerate, 1);
        assert_eq!(outcome.best.ellipse.width, 0.5);
        assert_eq!(outcome.best.inside_count, 0);
    }

    #[test]
    fn all_degenerate_grids_are_an_error() {
        let data = dataset_from_pm(&[(0.0, 0.0)]);
        let g = grid((2.0, 2.0, 1), (2.0, 2.0, 1), (0.0, 0.0, 1));
        let err = search_best_ellipse(&data, (0.0, 0.0), &g, &SilentProgress).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn the_densest_candidate_is_selected() {
        // A stretched cluster along x: the wide flat ellipse holds all five
        // points, narrower or upright candidates hold fewer.
        let data = dataset_from_pm(&[(0.0, 0.0), (2.0, 0.1), (-2.0, -0.1), (3.5, 0.0), (-3.5, 0.0)]);
        let g = grid((2.0, 8.0, 4), (1.0, 1.0, 1), (-90.0, 90.0, 3));
        let outcome = search_best_ellipse(&data, (0.0, 0.0), &g, &SilentProgress).unwrap();
        assert_eq!(outcome.best.ellipse.width, 8.0);
        assert_eq!(outcome.best.ellipse.inclination, 0.0);
        assert_eq!(outcome.best.inside_count, 5);
    }

    #[test]
    fn progress_reports_reach_the_full_grid() {
        struct CountingProgress(AtomicUsize);
        impl SweepProgress for CountingProgress {
            fn on_evaluated(&self, _done: usize, _total: usize) {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }

        let data = dataset_from_pm(&[(0.0, 0.0)]);
        let g = grid((1.0, 2.0, 2), (3.0, 4.0, 2), (0.0, 30.0, 2));
        let progress = CountingProgress(AtomicUsize::new(0));
        search_best_ellipse(&data, (0.0, 0.0), &g, &progress).unwrap();
        assert_eq!(progress.0.load(Ordering::Relaxed), 8);
    }
}

//! Human-in-the-loop refinement of the membership search.
//!
//! The loop is a small state machine fed by abstract decisions; all terminal
//! I/O lives behind [`RefineSession`], so the transitions are testable
//! without a terminal.
//!
//! States: `SEARCHING → REVIEW → {ACCEPTED, REFINE, ABORTED}`, with REFINE
//! looping back to SEARCHING under an updated grid.

use crate::domain::{Dataset, GridAxis, Mask, MembershipTag, SearchGrid, SearchRange};
use crate::error::AppError;
use crate::filter::apply_mask;
use crate::filter::grid::validate_grid;
use crate::filter::membership::classify_members;
use crate::filter::search::{SweepOutcome, SweepProgress, search_best_ellipse};

/// Verdict of a REVIEW step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Keep the current best and finalize.
    Accept,
    /// Adjust the grid and search again.
    Refine,
    /// Stop without saving anything.
    Abort,
}

/// Everything the REVIEW step may show the user.
#[derive(Debug, Clone)]
pub struct ReviewContext<'a> {
    pub outcome: &'a SweepOutcome,
    pub dataset: &'a Dataset,
    pub tags: &'a [MembershipTag],
    pub grid: &'a SearchGrid,
}

/// Interactive port of the refinement loop.
pub trait RefineSession {
    /// Render the current candidate (scatter, counts).
    ///
    /// Errors here are recoverable: the loop reports them through
    /// [`RefineSession::on_render_failure`], skips the visualization, and
    /// finalizes with the best ellipse found so far.
    fn render(&mut self, review: &ReviewContext<'_>) -> Result<(), AppError>;

    /// Ask for the REVIEW verdict.
    fn review(&mut self, review: &ReviewContext<'_>) -> Result<ReviewDecision, AppError>;

    /// Ask for a replacement range for one axis; returning `current`
    /// unchanged keeps it.
    fn revise(&mut self, axis: GridAxis, current: SearchRange) -> Result<SearchRange, AppError>;

    /// Called when rendering failed and the loop degrades.
    fn on_render_failure(&mut self, _error: &AppError) {}
}

/// The final selection of an accepted refinement run.
#[derive(Debug, Clone)]
pub struct AcceptedSelection {
    pub filtered: Dataset,
    pub mask: Mask,
    pub outcome: SweepOutcome,
    /// The grid that produced the accepted candidate.
    pub grid: SearchGrid,
}

/// Terminal states of the loop.
#[derive(Debug, Clone)]
pub enum RefineOutcome {
    /// The user accepted a candidate, or rendering failed and the loop
    /// degraded to the best found so far.
    Accepted(AcceptedSelection),
    /// The user stopped the program; nothing is saved.
    Aborted,
}

/// Run search/review/refine cycles until the user accepts or aborts.
///
/// The dataset is never mutated; each cycle classifies against a fresh mask
/// and the accepted result is a filtered copy.
pub fn run_refinement_loop(
    dataset: &Dataset,
    center: (f64, f64),
    initial_grid: SearchGrid,
    session: &mut dyn RefineSession,
    progress: &dyn SweepProgress,
) -> Result<RefineOutcome, AppError> {
    let mut grid = initial_grid;
    loop {
        // SEARCHING
        let outcome = search_best_ellipse(dataset, center, &grid, progress)?;
        let (mask, tags) = classify_members(dataset, &outcome.best.ellipse);

        // REVIEW
        let decision = {
            let review = ReviewContext {
                outcome: &outcome,
                dataset,
                tags: &tags,
                grid: &grid,
            };
            match session.render(&review) {
                Ok(()) => session.review(&review)?,
                Err(err) => {
                    // A broken plot must not sink the whole filtering run.
                    session.on_render_failure(&err);
                    ReviewDecision::Accept
                }
            }
        };

        match decision {
            ReviewDecision::Accept => {
                let filtered = apply_mask(dataset, &mask)?;
                return Ok(RefineOutcome::Accepted(AcceptedSelection {
                    filtered,
                    mask,
                    outcome,
                    grid,
                }));
            }
            ReviewDecision::Abort => return Ok(RefineOutcome::Aborted),
            ReviewDecision::Refine => {
                let mut next = grid;
                for axis in GridAxis::ALL {
                    next = next.with_axis(axis, session.revise(axis, next.axis(axis))?);
                }
                // Revised endpoints were re-sorted by `SearchRange::new`;
                // re-validate before the next sweep.
                grid = validate_grid(next.width, next.height, next.inclination)?;
            }
        }
    }
}

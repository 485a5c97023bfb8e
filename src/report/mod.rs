//! Formatted terminal summaries for extraction and filtering runs.
//!
//! We keep formatting code in one place so:
//!
//! - the geometry/search code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::SearchGrid;
use crate::filter::search::SweepOutcome;
use crate::io::table::TableRead;

/// Ratio of retained to original records, in percent.
pub fn survival_percent(inside: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        inside as f64 / total as f64 * 100.0
    }
}

/// Summarize an ingest: rows read, rows used, and the first few row errors.
pub fn format_ingest_summary(read: &TableRead) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Rows: read={} | used={} | skipped={}\n",
        read.rows_read,
        read.dataset.len(),
        read.row_errors.len()
    ));
    for row_error in read.row_errors.iter().take(5) {
        out.push_str(&format!(
            "  (line {}) {}\n",
            row_error.line, row_error.message
        ));
    }
    if read.row_errors.len() > 5 {
        out.push_str(&format!(
            "  ... and {} more skipped rows\n",
            read.row_errors.len() - 5
        ));
    }
    out
}

/// Summarize one sweep: grid, candidate counts, the best ellipse and the
/// survival percentage behind it.
pub fn format_search_summary(outcome: &SweepOutcome, total_count: usize, grid: &SearchGrid) -> String {
    let best = &outcome.best;
    let survival = survival_percent(best.inside_count, total_count);

    let mut out = String::new();
    out.push_str("=== astrogaia - VPD membership search ===\n");
    out.push_str(&format!(
        "Grid: {} ({} candidates)\n",
        format_grid(grid),
        grid.candidate_count()
    ));
    out.push_str(&format!(
        "Candidates: evaluated={} | skipped circles={}\n",
        outcome.evaluated, outcome.skipped_degenerate
    ));
    out.push_str(&format!(
        "Best ellipse: center=({:.3}, {:.3}) mas/yr | width={:.3} | height={:.3} | inclination={:.1} deg\n",
        best.ellipse.center_x,
        best.ellipse.center_y,
        best.ellipse.width,
        best.ellipse.height,
        best.ellipse.inclination
    ));
    out.push_str(&format!(
        "Members: {} | field: {} ({survival:.1}% of {} survive)\n",
        best.inside_count,
        total_count.saturating_sub(best.inside_count),
        total_count
    ));
    out
}

fn format_grid(grid: &SearchGrid) -> String {
    format!(
        "width=[{}, {}]x{} | height=[{}, {}]x{} | inclination=[{}, {}]x{}",
        grid.width.min(),
        grid.width.max(),
        grid.width.steps(),
        grid.height.min(),
        grid.height.max(),
        grid.height.steps(),
        grid.inclination.min(),
        grid.inclination.max(),
        grid.inclination.steps(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ellipse, ScoredEllipse, SearchRange};

    #[test]
    fn survival_handles_empty_tables() {
        assert_eq!(survival_percent(0, 0), 0.0);
        assert!((survival_percent(1, 4) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn search_summary_reports_counts_and_survival() {
        let outcome = SweepOutcome {
            best: ScoredEllipse {
                ellipse: Ellipse {
                    center_x: 5.0,
                    center_y: -2.5,
                    width: 1.5,
                    height: 0.75,
                    inclination: 30.0,
                },
                inside_count: 42,
            },
            evaluated: 120,
            skipped_degenerate: 5,
        };
        let grid = SearchGrid {
            width: SearchRange::new(0.5, 4.0, 5),
            height: SearchRange::new(0.5, 4.0, 5),
            inclination: SearchRange::new(-90.0, 90.0, 5),
        };
        let summary = format_search_summary(&outcome, 100, &grid);
        assert!(summary.contains("evaluated=120"));
        assert!(summary.contains("skipped circles=5"));
        assert!(summary.contains("Members: 42 | field: 58"));
        assert!(summary.contains("42.0% of 100 survive"));
    }
}

//! Interactive console prompts with a bounded retry budget.
//!
//! Unrecognized answers re-prompt up to [`MAX_ATTEMPTS`] times; running out
//! is fatal and terminates the operation without partial saves. This keeps
//! the refinement loop itself free of terminal concerns: it only ever sees
//! decisions and ranges.

use std::io::{self, BufRead, Write};

use crate::console;
use crate::domain::{GridAxis, SearchRange};
use crate::error::AppError;
use crate::filter::refine::{RefineSession, ReviewContext, ReviewDecision};
use crate::plot::render_vpd_scatter;
use crate::report;

/// How many unrecognized answers a single prompt tolerates.
const MAX_ATTEMPTS: usize = 3;

fn prompt_parse<T>(text: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T, AppError> {
    let stdin = io::stdin();
    for _ in 0..MAX_ATTEMPTS {
        print!("{text} ");
        io::stdout()
            .flush()
            .map_err(|e| AppError::invariant(format!("Failed to write prompt: {e}")))?;

        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| AppError::invariant(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::input("No input received (end of stream)."));
        }

        match parse(line.trim()) {
            Some(value) => return Ok(value),
            None => console::warn("Unrecognized answer, try again."),
        }
    }
    Err(AppError::input(format!(
        "No valid answer after {MAX_ATTEMPTS} attempts."
    )))
}

/// Ask a yes/no question; accepts y/yes/n/no, case-insensitively.
pub fn prompt_yes_no(text: &str) -> Result<bool, AppError> {
    prompt_parse(text, |answer| {
        match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(true),
            "n" | "no" => Some(false),
            _ => None,
        }
    })
}

/// Ask for a finite floating-point value.
pub fn prompt_float(text: &str) -> Result<f64, AppError> {
    prompt_parse(text, |answer| {
        answer.parse::<f64>().ok().filter(|v| v.is_finite())
    })
}

/// Ask for a step count (at least 1).
pub fn prompt_steps(text: &str) -> Result<usize, AppError> {
    prompt_parse(text, |answer| {
        answer.parse::<usize>().ok().filter(|&v| v >= 1)
    })
}

/// Console-backed refinement session: prints the summary and scatter, asks
/// the review questions, and collects replacement ranges axis by axis.
pub struct ConsoleSession {
    pub plot_width: usize,
    pub plot_height: usize,
}

impl RefineSession for ConsoleSession {
    fn render(&mut self, review: &ReviewContext<'_>) -> Result<(), AppError> {
        let plot = render_vpd_scatter(
            review.dataset,
            Some(review.tags),
            Some(&review.outcome.best.ellipse),
            self.plot_width,
            self.plot_height,
        )?;
        println!("{plot}");
        Ok(())
    }

    fn review(&mut self, review: &ReviewContext<'_>) -> Result<ReviewDecision, AppError> {
        print!(
            "{}",
            report::format_search_summary(review.outcome, review.dataset.len(), review.grid)
        );
        if prompt_yes_no("Happy with this selection? [y/n]")? {
            return Ok(ReviewDecision::Accept);
        }
        if prompt_yes_no("Continue the program? [y/n]")? {
            Ok(ReviewDecision::Refine)
        } else {
            Ok(ReviewDecision::Abort)
        }
    }

    fn revise(&mut self, axis: GridAxis, current: SearchRange) -> Result<SearchRange, AppError> {
        console::info(&format!(
            "{}: [{}, {}] x {} steps",
            axis.label(),
            current.min(),
            current.max(),
            current.steps()
        ));
        if !prompt_yes_no(&format!("Change the {} range? [y/n]", axis.label()))? {
            return Ok(current);
        }
        let a = prompt_float("New minimum:")?;
        let b = prompt_float("New maximum:")?;
        let steps = prompt_steps("Steps:")?;
        Ok(SearchRange::new(a, b, steps))
    }

    fn on_render_failure(&mut self, error: &AppError) {
        console::warn(&format!(
            "Plotting failed ({error}); keeping the best selection found so far."
        ));
    }
}

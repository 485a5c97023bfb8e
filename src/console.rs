//! Console status output in the tool's house style.
//!
//! Tags mirror the original banner characters: `[*]` for progress notes,
//! `[+]` for results, `[!]` for warnings.

use std::sync::atomic::{AtomicUsize, Ordering};

use crossterm::style::Stylize;

use crate::filter::search::SweepProgress;

pub fn tag_info() -> String {
    "[*]".cyan().to_string()
}

pub fn tag_done() -> String {
    format!("{}{}{}", "[".red(), "+".yellow(), "]".red())
}

pub fn tag_warn() -> String {
    format!("{}{}{}", "[".yellow(), "!".red(), "]".yellow())
}

pub fn info(message: &str) {
    println!("{} {message}", tag_info());
}

pub fn success(message: &str) {
    println!("{} {message}", tag_done());
}

pub fn warn(message: &str) {
    eprintln!("{} {message}", tag_warn());
}

/// Sweep progress as an in-place percentage line on stderr.
pub struct PercentProgress {
    last: AtomicUsize,
}

impl PercentProgress {
    pub fn new() -> Self {
        Self {
            last: AtomicUsize::new(usize::MAX),
        }
    }
}

impl Default for PercentProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepProgress for PercentProgress {
    fn on_evaluated(&self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        let percent = done * 100 / total;
        // Workers race on this counter; a repeated percentage now and then is
        // harmless, the line just rewrites itself.
        let previous = self.last.swap(percent, Ordering::Relaxed);
        if previous != percent {
            eprint!("\r{} grid sweep {percent:>3}%", tag_info());
            if percent == 100 {
                eprintln!();
            }
        }
    }
}

//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that
//! parses the CLI and hands each command to its pipeline.

use clap::Parser;

use crate::cli::{Cli, Command, ExtractCommand};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `astrogaia` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Extract(ExtractCommand::Raw(args)) => pipeline::run_extract_raw(args),
        Command::Extract(ExtractCommand::Ring(args)) => pipeline::run_extract_ring(args),
        Command::Filter(args) => pipeline::run_filter(args),
        Command::Plot(args) => pipeline::run_plot(args),
        Command::Sample(args) => pipeline::run_sample(args),
    }
}

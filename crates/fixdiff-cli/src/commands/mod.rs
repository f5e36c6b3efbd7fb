//! Subcommand implementations
//!
//! Every command returns the verdict that decides the process exit code.

pub mod compare;
pub mod exec;
pub mod offset;
pub mod run;

use clap::{Args, ValueEnum};
use fixdiff_core::diff::{render_json_report, render_text_report};
use fixdiff_core::{CompareOptions, DiffReport, ExError};
use fixdiff_harness::Verdict;
use std::num::NonZeroUsize;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Comparison flags shared by `compare` and `exec`
#[derive(Debug, Args)]
pub struct DiffFlags {
    /// Maximum number of divergent lines to list (default: 5)
    #[arg(long)]
    pub max_reported: Option<NonZeroUsize>,

    /// Keep a trailing empty line instead of ignoring it
    #[arg(long)]
    pub no_trim: bool,
}

impl DiffFlags {
    pub fn compare_options(&self) -> CompareOptions {
        let mut options = CompareOptions::default().with_trim_trailing_newline(!self.no_trim);
        if let Some(max) = self.max_reported {
            options = options.with_max_reported(max);
        }
        options
    }
}

pub fn print_report(report: &DiffReport, format: OutputFormat) -> Result<(), ExError> {
    match format {
        OutputFormat::Text => print!("{}", render_text_report(report)),
        OutputFormat::Json => println!("{}", render_json_report(report)?),
    }
    Ok(())
}

pub fn report_verdict(report: &DiffReport) -> Verdict {
    if report.matches {
        Verdict::Match
    } else {
        Verdict::Mismatch
    }
}

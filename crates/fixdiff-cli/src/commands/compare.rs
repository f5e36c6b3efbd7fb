//! Compare command
//!
//! Usage: fixdiff compare <ACTUAL> <EXPECTED> [--max-reported N] [--no-trim] [--format text|json]

use super::{print_report, report_verdict, DiffFlags, OutputFormat};
use clap::Args;
use fixdiff_core::{compare, Document, ExError};
use fixdiff_harness::fixture::read_fixture_file;
use fixdiff_harness::Verdict;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// File holding the produced document
    pub actual: PathBuf,

    /// File holding the reference document
    pub expected: PathBuf,

    #[command(flatten)]
    pub diff: DiffFlags,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn execute(args: CompareArgs) -> Result<Verdict, ExError> {
    let actual = Document::new(read_fixture_file(&args.actual)?);
    let expected = Document::new(read_fixture_file(&args.expected)?);

    let report = compare(&actual, &expected, &args.diff.compare_options());
    print_report(&report, args.format)?;
    Ok(report_verdict(&report))
}

//! Offset command
//!
//! Usage: fixdiff offset <ACTUAL> <EXPECTED> [--context[=CHARS]]
//!
//! Prints the character offset of the first difference, or `identical`.
//! With `--context` it also shows the line and the text around the offset.

use clap::Args;
use fixdiff_core::diff::{offset_context, render_offset_context};
use fixdiff_core::{first_differing_offset, Document, ExError};
use fixdiff_harness::fixture::read_fixture_file;
use fixdiff_harness::Verdict;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct OffsetArgs {
    pub actual: PathBuf,
    pub expected: PathBuf,

    /// Show this many characters on each side of the difference (default: 50)
    #[arg(
        long,
        value_name = "CHARS",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "50"
    )]
    pub context: Option<usize>,
}

pub fn execute(args: OffsetArgs) -> Result<Verdict, ExError> {
    let actual = Document::new(read_fixture_file(&args.actual)?);
    let expected = Document::new(read_fixture_file(&args.expected)?);

    let Some(offset) = first_differing_offset(&actual, &expected) else {
        println!("identical");
        return Ok(Verdict::Match);
    };

    match args
        .context
        .and_then(|radius| offset_context(&actual, &expected, radius))
    {
        Some(context) => print!("{}", render_offset_context(&context)),
        None => println!("{}", offset),
    }
    Ok(Verdict::Mismatch)
}

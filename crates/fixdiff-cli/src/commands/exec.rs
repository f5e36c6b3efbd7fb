//! Exec command
//!
//! Usage: fixdiff exec --input <FILE> --expected <FILE> [--timeout-ms N] [--save-actual <FILE>] -- <PROGRAM> [ARGS...]
//!
//! Runs one tool invocation without a config file. The tool runs in the
//! current directory and inherits the environment.

use super::{print_report, report_verdict, DiffFlags, OutputFormat};
use clap::Args;
use fixdiff_core::{Document, ExError, ExErrorKind};
use fixdiff_harness::fixture::{read_fixture_file, save_actual};
use fixdiff_harness::{check_output, ToolCommand, Verdict};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct ExecArgs {
    /// File fed to the tool on stdin
    #[arg(long)]
    pub input: PathBuf,

    /// File the tool's stdout is compared against
    #[arg(long)]
    pub expected: PathBuf,

    /// Kill the tool if it runs longer than this
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Also write the tool's output to this file
    #[arg(long, value_name = "FILE")]
    pub save_actual: Option<PathBuf>,

    #[command(flatten)]
    pub diff: DiffFlags,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Program and arguments to run
    #[arg(last = true, required = true, num_args = 1..)]
    pub command: Vec<String>,
}

pub fn execute(args: ExecArgs) -> Result<Verdict, ExError> {
    let (program, program_args) = args.command.split_first().ok_or_else(|| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("exec")
            .with_message("no program given")
    })?;

    let mut command = ToolCommand::new(program.as_str()).with_args(program_args.iter().cloned());
    if let Some(ms) = args.timeout_ms {
        command = command.with_timeout(Duration::from_millis(ms));
    }

    let input = read_fixture_file(&args.input)?;
    let expected = Document::new(read_fixture_file(&args.expected)?);

    let check = check_output(&command, &input, &expected, &args.diff.compare_options())?;
    if let Some(path) = &args.save_actual {
        save_actual(path, &check.output.stdout)?;
    }
    print_report(&check.report, args.format)?;
    Ok(report_verdict(&check.report))
}

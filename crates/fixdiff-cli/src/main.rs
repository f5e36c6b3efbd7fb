//! fixdiff CLI
//!
//! Command-line interface for comparing formatter output against fixtures.
//! Reports go to stdout, logs to stderr. The exit code is 0 when everything
//! matches, 1 on any mismatch and 2 on any error.

use clap::{Parser, Subcommand, ValueEnum};
use fixdiff_core::logging_facility::{init, Profile};
use std::process::ExitCode;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "fixdiff")]
#[command(about = "fixdiff - line-oriented fixture comparison", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two files line by line
    Compare(commands::compare::CompareArgs),
    /// Print the first differing character offset of two files
    Offset(commands::offset::OffsetArgs),
    /// Run a tool on an input file and compare its output to an expected file
    Exec(commands::exec::ExecArgs),
    /// Run the cases of a harness config file
    Run(commands::run::RunArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Compare(args) => commands::compare::execute(args),
        Commands::Offset(args) => commands::offset::execute(args),
        Commands::Exec(args) => commands::exec::execute(args),
        Commands::Run(args) => commands::run::execute(args),
    };

    match result {
        Ok(verdict) => ExitCode::from(verdict.exit_code()),
        Err(e) => {
            tracing::debug!(err_code = e.code(), "command failed");
            eprintln!("Error: {}", e);
            ExitCode::from(fixdiff_harness::Verdict::Error.exit_code())
        }
    }
}

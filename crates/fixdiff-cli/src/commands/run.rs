//! Run command
//!
//! Usage: fixdiff run --config <FILE> [--case NAME]... [--bless] [--format text|json]

use super::OutputFormat;
use clap::Args;
use fixdiff_core::{render_text_report, ExError, ExErrorKind};
use fixdiff_harness::{
    load_config, run_suite, CaseOutcome, CaseResult, RunOptions, SuiteOutcome, Verdict,
};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Harness config file
    #[arg(long)]
    pub config: PathBuf,

    /// Only run the named case (repeatable)
    #[arg(long = "case", value_name = "NAME")]
    pub cases: Vec<String>,

    /// Write expected files from the actual output of mismatching cases,
    /// creating missing ones
    #[arg(long)]
    pub bless: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn execute(args: RunArgs) -> Result<Verdict, ExError> {
    let config = load_config(&args.config)?;
    let options = RunOptions {
        cases: args.cases,
        bless: args.bless,
    };
    let suite = run_suite(&config, &options)?;

    match args.format {
        OutputFormat::Text => print!("{}", render_suite_text(&suite)),
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&suite_json(&suite)).map_err(|e| {
                ExError::new(ExErrorKind::Serialization)
                    .with_op("run")
                    .with_message(e.to_string())
            })?;
            println!("{}", text);
        }
    }
    Ok(suite.verdict())
}

fn status(result: &CaseResult) -> &'static str {
    match &result.outcome {
        Ok(outcome) if outcome.blessed => "blessed",
        Ok(outcome) if outcome.report.matches => "match",
        Ok(_) => "mismatch",
        Err(_) => "error",
    }
}

fn render_suite_text(suite: &SuiteOutcome) -> String {
    let mut out = String::new();
    for result in &suite.results {
        out.push_str(&format!("{:<8} {}\n", status(result).to_uppercase(), result.name));
        if let Ok(CaseOutcome {
            actual_saved: Some(path),
            ..
        }) = &result.outcome
        {
            out.push_str(&format!("    actual output saved to {}\n", path.display()));
        }
        match &result.outcome {
            Ok(outcome) if !outcome.passed() => {
                for line in render_text_report(&outcome.report).lines() {
                    if line.is_empty() {
                        out.push('\n');
                    } else {
                        out.push_str(&format!("    {}\n", line));
                    }
                }
            }
            Ok(_) => {}
            Err(e) => out.push_str(&format!("    {}\n", ExError::from(e))),
        }
    }
    out.push_str(&format!(
        "\n{} matched, {} mismatched, {} errored (run {})\n",
        suite.count(Verdict::Match),
        suite.count(Verdict::Mismatch),
        suite.count(Verdict::Error),
        suite.run_id
    ));
    out
}

fn suite_json(suite: &SuiteOutcome) -> Value {
    let cases: Vec<Value> = suite
        .results
        .iter()
        .map(|result| match &result.outcome {
            Ok(outcome) => json!({
                "name": result.name,
                "status": status(result),
                "duration_ms": outcome.duration.as_millis() as u64,
                "actual_output": outcome.actual_saved.as_ref().map(|p| p.display().to_string()),
                "report": outcome.report,
            }),
            Err(e) => {
                let ex = ExError::from(e);
                json!({
                    "name": result.name,
                    "status": status(result),
                    "error": {
                        "code": ex.code(),
                        "message": ex.to_string(),
                    },
                })
            }
        })
        .collect();

    json!({
        "run_id": suite.run_id,
        "matched": suite.count(Verdict::Match),
        "mismatched": suite.count(Verdict::Mismatch),
        "errored": suite.count(Verdict::Error),
        "cases": cases,
    })
}

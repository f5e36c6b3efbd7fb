//! Case and suite orchestration with boundary logging.
//!
//! Flow for one case: read fixture -> run tool on the input -> compare the
//! captured stdout against the expected document -> optionally bless.
//!
//! ## Logging Ownership
//!
//! This module owns lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success (mismatches included)
//! - `log_op_error!` on failure

use crate::config::{CaseConfig, HarnessConfig};
use crate::errors::Result;
use crate::fixture::{bless_expected, load_fixture, save_actual};
use crate::process::{ToolCommand, ToolOutput};
use fixdiff_core::diff::{compare, CompareOptions, DiffReport, Document};
use fixdiff_core::{log_op_end, log_op_error, log_op_start};
use fixdiff_core_types::RunId;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Overall result of a run, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verdict {
    Match,
    Mismatch,
    Error,
}

impl Verdict {
    /// Process exit code for this verdict
    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::Match => 0,
            Verdict::Mismatch => 1,
            Verdict::Error => 2,
        }
    }
}

/// Suite-level switches
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only run these cases (all cases when empty)
    pub cases: Vec<String>,
    /// Overwrite expected files with the actual output on mismatch
    pub bless: bool,
}

/// Result of running one case to completion
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub name: String,
    pub report: DiffReport,
    /// The expected file was written with the actual output
    pub blessed: bool,
    /// Where the actual output was saved, when the case asks for it
    pub actual_saved: Option<PathBuf>,
    pub duration: Duration,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.report.matches || self.blessed
    }

    pub fn verdict(&self) -> Verdict {
        if self.passed() {
            Verdict::Match
        } else {
            Verdict::Mismatch
        }
    }
}

/// A case that either ran or failed with an error
#[derive(Debug)]
pub struct CaseResult {
    pub name: String,
    pub outcome: Result<CaseOutcome>,
}

impl CaseResult {
    pub fn verdict(&self) -> Verdict {
        match &self.outcome {
            Ok(outcome) => outcome.verdict(),
            Err(_) => Verdict::Error,
        }
    }
}

/// Results of every selected case, in run order
#[derive(Debug)]
pub struct SuiteOutcome {
    pub run_id: RunId,
    pub results: Vec<CaseResult>,
}

impl SuiteOutcome {
    /// Worst verdict across all cases; `Match` for an empty suite
    pub fn verdict(&self) -> Verdict {
        self.results
            .iter()
            .map(CaseResult::verdict)
            .max()
            .unwrap_or(Verdict::Match)
    }

    /// Number of cases with the given verdict
    pub fn count(&self, verdict: Verdict) -> usize {
        self.results
            .iter()
            .filter(|r| r.verdict() == verdict)
            .count()
    }
}

/// A tool run together with the comparison of its stdout
#[derive(Debug, Clone)]
pub struct ToolCheck {
    pub report: DiffReport,
    pub output: ToolOutput,
}

/// Run a tool on `input` and compare its stdout against `expected`
///
/// Used directly by ad-hoc invocations that have no config file.
///
/// # Errors
///
/// Any tool invocation failure; a mismatch is returned as a report.
pub fn check_output(
    command: &ToolCommand,
    input: &str,
    expected: &Document,
    options: &CompareOptions,
) -> Result<ToolCheck> {
    log_op_start!("check_output", program = command.program());
    let start = Instant::now();

    let output = command.run(input).map_err(|e| {
        log_op_error!(
            "check_output",
            &e,
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;
    let report = compare(&Document::new(output.stdout.as_str()), expected, options);

    log_op_end!(
        "check_output",
        duration_ms = start.elapsed().as_millis() as u64,
        matches = report.matches,
        divergent_lines = report.total_divergent_lines
    );
    Ok(ToolCheck { report, output })
}

/// Run a single configured case
///
/// # Errors
///
/// - `FixtureRead` if the input or expected file cannot be read
/// - Any tool invocation failure
/// - `FixtureWrite` if blessing or saving the actual output fails
pub fn run_case(config: &HarnessConfig, case: &CaseConfig, bless: bool) -> Result<CaseOutcome> {
    log_op_start!("run_case", case = %case.name);
    let start = Instant::now();

    let outcome = run_case_impl(config, case, bless, start).map_err(|e| {
        log_op_error!(
            "run_case",
            &e,
            duration_ms = start.elapsed().as_millis() as u64,
            case = %case.name
        );
        e
    })?;

    log_op_end!(
        "run_case",
        duration_ms = outcome.duration.as_millis() as u64,
        case = %case.name,
        matches = outcome.report.matches,
        divergent_lines = outcome.report.total_divergent_lines,
        blessed = outcome.blessed
    );
    Ok(outcome)
}

fn run_case_impl(
    config: &HarnessConfig,
    case: &CaseConfig,
    bless: bool,
    start: Instant,
) -> Result<CaseOutcome> {
    let expected_path = config.resolve(&case.expected);
    let fixture = load_fixture(&config.resolve(&case.input), &expected_path, bless)?;

    let output = config.command_for(case).run(&fixture.input)?;
    let report = compare(
        &Document::new(output.stdout.as_str()),
        &fixture.expected,
        &config.compare,
    );

    let actual_saved = match &case.actual_output {
        Some(path) => {
            let path = config.resolve(path);
            save_actual(&path, &output.stdout)?;
            Some(path)
        }
        None => None,
    };

    // A missing expected file is created even when empty output matches it.
    let blessed = bless && (!report.matches || !fixture.expected_exists);
    if blessed {
        bless_expected(&expected_path, &output.stdout)?;
        tracing::info!(case = %case.name, path = %expected_path.display(), "blessed expected output");
    }

    Ok(CaseOutcome {
        name: case.name.clone(),
        report,
        blessed,
        actual_saved,
        duration: start.elapsed(),
    })
}

/// Run the selected cases of a suite in order
///
/// Case failures are recorded per case and do not stop the suite.
///
/// # Errors
///
/// - `UnknownCase` if a requested case name is not configured
pub fn run_suite(config: &HarnessConfig, options: &RunOptions) -> Result<SuiteOutcome> {
    let cases = config.select_cases(&options.cases)?;
    let run_id = RunId::new();

    log_op_start!("run_suite", run_id = %run_id, cases = cases.len());
    let start = Instant::now();

    let results: Vec<CaseResult> = cases
        .into_iter()
        .map(|case| CaseResult {
            name: case.name.clone(),
            outcome: run_case(config, case, options.bless),
        })
        .collect();

    let suite = SuiteOutcome { run_id, results };
    log_op_end!(
        "run_suite",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %suite.run_id,
        passed = suite.count(Verdict::Match),
        mismatched = suite.count(Verdict::Mismatch),
        errored = suite.count(Verdict::Error)
    );
    Ok(suite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HarnessError;

    #[test]
    fn test_verdict_ordering_and_exit_codes() {
        assert!(Verdict::Match < Verdict::Mismatch);
        assert!(Verdict::Mismatch < Verdict::Error);
        assert_eq!(Verdict::Match.exit_code(), 0);
        assert_eq!(Verdict::Mismatch.exit_code(), 1);
        assert_eq!(Verdict::Error.exit_code(), 2);
    }

    #[test]
    fn test_empty_suite_matches() {
        let suite = SuiteOutcome {
            run_id: RunId::new(),
            results: Vec::new(),
        };
        assert_eq!(suite.verdict(), Verdict::Match);
    }

    #[test]
    fn test_error_dominates_suite_verdict() {
        let report = compare(
            &Document::new("a"),
            &Document::new("b"),
            &CompareOptions::default(),
        );
        let suite = SuiteOutcome {
            run_id: RunId::new(),
            results: vec![
                CaseResult {
                    name: "mismatch".to_string(),
                    outcome: Ok(CaseOutcome {
                        name: "mismatch".to_string(),
                        report,
                        blessed: false,
                        actual_saved: None,
                        duration: Duration::ZERO,
                    }),
                },
                CaseResult {
                    name: "broken".to_string(),
                    outcome: Err(HarnessError::UnknownCase {
                        name: "broken".to_string(),
                    }),
                },
            ],
        };
        assert_eq!(suite.verdict(), Verdict::Error);
        assert_eq!(suite.count(Verdict::Mismatch), 1);
        assert_eq!(suite.count(Verdict::Error), 1);
    }

    #[test]
    fn test_blessed_mismatch_passes() {
        let report = compare(
            &Document::new("a"),
            &Document::new("b"),
            &CompareOptions::default(),
        );
        let outcome = CaseOutcome {
            name: "c".to_string(),
            report,
            blessed: true,
            actual_saved: None,
            duration: Duration::ZERO,
        };
        assert!(outcome.passed());
        assert_eq!(outcome.verdict(), Verdict::Match);
    }
}

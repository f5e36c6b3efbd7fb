//! fixdiff Harness - fixture-driven checks of external formatters
//!
//! This crate is the glue around the core diff reporter:
//! - `config`: TOML harness configuration (tool command, compare options, cases)
//! - `fixture`: reading input/expected files and blessing expected files
//! - `process`: scoped invocation of an external tool over stdin/stdout
//! - `runner`: orchestration of single cases and whole suites
//!
//! ## Logging Ownership
//!
//! The runner owns lifecycle logging (`log_op_start!`, `log_op_end!`,
//! `log_op_error!`). Lower layers use `tracing::debug!` only.

pub mod config;
pub mod errors;
pub mod fixture;
pub mod process;
pub mod runner;

pub use config::{load_config, CaseConfig, HarnessConfig, ToolConfig};
pub use errors::{HarnessError, Result};
pub use fixture::{bless_expected, load_fixture, save_actual, Fixture};
pub use process::{ToolCommand, ToolOutput};
pub use runner::{
    check_output, run_case, run_suite, CaseOutcome, CaseResult, RunOptions, SuiteOutcome,
    ToolCheck, Verdict,
};

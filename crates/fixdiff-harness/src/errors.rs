//! Error handling for fixdiff-harness
//!
//! `HarnessError` keeps the typed I/O sources for callers that want them;
//! every variant maps onto the canonical `ExError` facility for logging and
//! CLI reporting.

use fixdiff_core::errors::{ExError, ExErrorKind};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using HarnessError
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Failures of the glue layer around the diff reporter.
///
/// A content mismatch is never represented here.
#[derive(Error, Debug)]
pub enum HarnessError {
    // ===== Configuration =====
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {message}", .path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("unknown case: {name}")]
    UnknownCase { name: String },

    // ===== Fixtures =====
    #[error("failed to read fixture {}: {source}", .path.display())]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write fixture {}: {source}", .path.display())]
    FixtureWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===== Tool invocation =====
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O failure while running {program}: {source}")]
    ToolIo {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} {}{}", describe_exit(.exit_code), describe_stderr(.stderr))]
    ToolFailed {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("{program} did not exit within {timeout_ms} ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("{program} wrote non-UTF-8 output: {source}")]
    Decoding {
        program: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl HarnessError {
    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            HarnessError::ConfigRead { .. } | HarnessError::InvalidConfig { .. } => {
                ExErrorKind::InvalidConfig
            }
            HarnessError::UnknownCase { .. } => ExErrorKind::NotFound,
            HarnessError::FixtureRead { .. } => ExErrorKind::FixtureRead,
            HarnessError::FixtureWrite { .. } => ExErrorKind::FixtureWrite,
            HarnessError::Spawn { .. } => ExErrorKind::Spawn,
            HarnessError::ToolIo { .. } => ExErrorKind::Io,
            HarnessError::ToolFailed { .. } => ExErrorKind::ToolFailed,
            HarnessError::Timeout { .. } => ExErrorKind::Timeout,
            HarnessError::Decoding { .. } => ExErrorKind::Decoding,
        }
    }
}

impl From<&HarnessError> for ExError {
    fn from(err: &HarnessError) -> Self {
        let ex = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            HarnessError::ConfigRead { path, .. } | HarnessError::InvalidConfig { path, .. } => ex
                .with_op("load_config")
                .with_path(path.display().to_string()),
            HarnessError::UnknownCase { name } => ex.with_op("select_cases").with_case(name),
            HarnessError::FixtureRead { path, .. } => ex
                .with_op("read_fixture")
                .with_path(path.display().to_string()),
            HarnessError::FixtureWrite { path, .. } => ex
                .with_op("bless_expected")
                .with_path(path.display().to_string()),
            HarnessError::Spawn { program, .. }
            | HarnessError::ToolIo { program, .. }
            | HarnessError::Timeout { program, .. }
            | HarnessError::Decoding { program, .. } => {
                ex.with_op("run_tool").with_program(program)
            }
            HarnessError::ToolFailed {
                program, exit_code, ..
            } => {
                let ex = ex.with_op("run_tool").with_program(program);
                match exit_code {
                    Some(code) => ex.with_exit_code(*code),
                    None => ex,
                }
            }
        }
    }
}

impl From<HarnessError> for ExError {
    fn from(err: HarnessError) -> Self {
        ExError::from(&err)
    }
}

//! Harness configuration
//!
//! A TOML file names the external tool, the compare options and the list of
//! cases. Relative paths in the file are resolved against the directory that
//! contains it, so a suite can be run from any working directory.
//!
//! ```toml
//! [tool]
//! program = "node"
//! args = ["scripts/format.js"]
//! timeout_ms = 30000
//!
//! [compare]
//! max_reported = 5
//!
//! [[case]]
//! name = "paragraph"
//! input = "fixtures/paragraph.html"
//! expected = "fixtures/paragraph.expected.html"
//! actual_output = "out/paragraph.actual.html"
//! ```

use crate::errors::{HarnessError, Result};
use crate::process::ToolCommand;
use fixdiff_core::diff::CompareOptions;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level harness configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    pub tool: ToolConfig,
    #[serde(default)]
    pub compare: CompareOptions,
    #[serde(default, rename = "case")]
    pub cases: Vec<CaseConfig>,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// The external tool every case is piped through
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// One input/expected fixture pair
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseConfig {
    pub name: String,
    pub input: PathBuf,
    pub expected: PathBuf,
    /// Extra arguments appended to the tool's own
    #[serde(default)]
    pub args: Vec<String>,
    /// Where to keep the tool's latest actual output, if anywhere
    pub actual_output: Option<PathBuf>,
}

/// Load and validate a harness config file
///
/// # Errors
///
/// - `ConfigRead` if the file cannot be read
/// - `InvalidConfig` if it is not valid TOML or fails validation
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    parse_config(&content, base_dir).map_err(|message| HarnessError::InvalidConfig {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse and validate config text, resolving paths against `base_dir`
///
/// Returns the validation message on failure; `load_config` attaches the path.
pub fn parse_config(content: &str, base_dir: &Path) -> std::result::Result<HarnessConfig, String> {
    let mut config: HarnessConfig = toml::from_str(content).map_err(|e| e.to_string())?;
    config.base_dir = base_dir.to_path_buf();
    config.validate()?;
    Ok(config)
}

impl HarnessConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.tool.program.trim().is_empty() {
            return Err("tool.program must not be empty".to_string());
        }
        if self.tool.timeout_ms == Some(0) {
            return Err("tool.timeout_ms must be positive".to_string());
        }

        let mut names = BTreeSet::new();
        for case in &self.cases {
            if case.name.trim().is_empty() {
                return Err("case.name must not be empty".to_string());
            }
            if !names.insert(case.name.as_str()) {
                return Err(format!("duplicate case name: {}", case.name));
            }
        }
        Ok(())
    }

    /// Resolve a config-relative path
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Look up cases by name, in the order given; all cases when `names` is empty
    ///
    /// # Errors
    ///
    /// - `UnknownCase` for the first name that matches no case
    pub fn select_cases(&self, names: &[String]) -> Result<Vec<&CaseConfig>> {
        if names.is_empty() {
            return Ok(self.cases.iter().collect());
        }
        names
            .iter()
            .map(|name| {
                self.cases
                    .iter()
                    .find(|case| &case.name == name)
                    .ok_or_else(|| HarnessError::UnknownCase { name: name.clone() })
            })
            .collect()
    }

    /// Build the tool invocation for one case
    pub fn command_for(&self, case: &CaseConfig) -> ToolCommand {
        let tool = &self.tool;
        let mut command = ToolCommand::new(self.resolve_program(&tool.program))
            .with_args(tool.args.iter().chain(case.args.iter()).cloned())
            .with_envs(tool.env.clone())
            .with_working_dir(self.resolve(tool.working_dir.as_deref().unwrap_or(Path::new("."))));
        if let Some(ms) = tool.timeout_ms {
            command = command.with_timeout(Duration::from_millis(ms));
        }
        command
    }

    /// Bare program names go through PATH lookup; anything with a directory
    /// component is resolved like the other config paths.
    fn resolve_program(&self, program: &str) -> String {
        let path = Path::new(program);
        if path.components().count() > 1 {
            self.resolve(path).display().to_string()
        } else {
            program.to_string()
        }
    }
}

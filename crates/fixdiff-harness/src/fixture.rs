//! Fixture loading and blessing

use crate::errors::{HarnessError, Result};
use fixdiff_core::diff::Document;
use std::fs;
use std::path::Path;

/// An input to feed the tool and the output it is expected to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub input: String,
    pub expected: Document,
    /// False when the expected file was missing and loaded as empty
    pub expected_exists: bool,
}

/// Read both halves of a fixture
///
/// When `allow_missing_expected` is set, a nonexistent expected file loads as
/// an empty document so that blessing can create it.
///
/// # Errors
///
/// - `FixtureRead` if either file cannot be read
pub fn load_fixture(input: &Path, expected: &Path, allow_missing_expected: bool) -> Result<Fixture> {
    let input = read_fixture_file(input)?;
    if allow_missing_expected && !expected.exists() {
        tracing::debug!(path = %expected.display(), "expected file missing, starting empty");
        return Ok(Fixture {
            input,
            expected: Document::default(),
            expected_exists: false,
        });
    }
    Ok(Fixture {
        input,
        expected: Document::new(read_fixture_file(expected)?),
        expected_exists: true,
    })
}

/// Read a fixture file to string
///
/// # Errors
///
/// - `FixtureRead` if the file is missing, unreadable or not UTF-8
pub fn read_fixture_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| HarnessError::FixtureRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace an expected file with new content
///
/// # Errors
///
/// - `FixtureWrite` if the file cannot be written
pub fn bless_expected(path: &Path, content: &str) -> Result<()> {
    write_replacing(path, content)
}

/// Write a tool's actual output next to its fixtures for inspection
///
/// # Errors
///
/// - `FixtureWrite` if the file cannot be written
pub fn save_actual(path: &Path, content: &str) -> Result<()> {
    write_replacing(path, content)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "saved actual output");
    Ok(())
}

/// Writes a sibling temp file and renames it over the target so readers never
/// see a partial file. Missing parent directories are created.
fn write_replacing(path: &Path, content: &str) -> Result<()> {
    let write_error = |source| HarnessError::FixtureWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, content).map_err(write_error)?;
    fs::rename(&temp_path, path).map_err(write_error)?;
    Ok(())
}

//! Document and comparison report types.
//!
//! Report types implement `Serialize` so the CLI can emit them as JSON.
//! Entries are kept in ascending line order for deterministic output.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Default cap on the number of entries kept in a [`DiffReport`].
pub const DEFAULT_MAX_REPORTED: usize = 5;

/// Characters shown on each side of a differing offset unless overridden
pub const DEFAULT_CONTEXT_RADIUS: usize = 50;

/// An immutable text value compared line by line.
///
/// Lines are separated by `\n` only; carriage returns are kept as part of the
/// line content. The empty document has no lines at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Split the document into lines.
    ///
    /// With `trim_trailing_newline`, the single empty line produced by a
    /// terminal `\n` is dropped. At most one line is ever dropped, so
    /// `"a\n\n"` still yields `["a", ""]`. The empty document has no lines,
    /// while `"\n"` keeps one empty line after trimming.
    pub fn lines(&self, trim_trailing_newline: bool) -> Vec<&str> {
        if self.text.is_empty() {
            return Vec::new();
        }
        let mut lines: Vec<&str> = self.text.split('\n').collect();
        if trim_trailing_newline && lines.last() == Some(&"") {
            lines.pop();
        }
        lines
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Content of one side of a divergent line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum LineContent {
    /// The document has this line
    Text(String),
    /// The document ended before this line
    Absent,
}

impl LineContent {
    pub fn from_line(line: Option<&str>) -> Self {
        match line {
            Some(text) => LineContent::Text(text.to_string()),
            None => LineContent::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, LineContent::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            LineContent::Text(text) => Some(text),
            LineContent::Absent => None,
        }
    }
}

/// One divergent line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffEntry {
    /// 1-based line number
    pub line: usize,
    /// Line from the actual document
    pub actual: LineContent,
    /// Line from the expected document
    pub expected: LineContent,
    /// 0-based character column of the first difference, when both sides
    /// have the line
    pub column: Option<usize>,
}

/// Result of comparing an actual document against an expected one.
///
/// `matches` is true iff `entries` is empty iff `total_divergent_lines` is 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffReport {
    pub matches: bool,
    /// Number of divergent lines over the whole documents
    pub total_divergent_lines: usize,
    /// The first divergent lines, at most `max_reported` of them
    pub entries: Vec<DiffEntry>,
    pub max_reported: usize,
    /// Line count of the actual document after trimming
    pub actual_line_count: usize,
    /// Line count of the expected document after trimming
    pub expected_line_count: usize,
    /// 0-based character offset of the first difference in the raw texts,
    /// `None` when the documents match
    pub first_differing_offset: Option<usize>,
}

/// Surroundings of the first differing character of two documents.
///
/// Both documents agree on everything before `offset`, so `line` and
/// `column` locate it in either one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OffsetContext {
    /// 0-based character offset of the first difference
    pub offset: usize,
    /// 1-based line containing the offset
    pub line: usize,
    /// 0-based character column of the offset within that line
    pub column: usize,
    /// Characters around the offset in the actual document
    pub actual_window: String,
    /// Same character range of the expected document
    pub expected_window: String,
    pub actual_line: LineContent,
    pub expected_line: LineContent,
}

impl DiffReport {
    /// True when more divergent lines exist than entries were kept
    pub fn is_truncated(&self) -> bool {
        self.total_divergent_lines > self.entries.len()
    }
}

/// Options recognised by [`compare`](crate::diff::engine::compare).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CompareOptions {
    /// Maximum number of entries kept in the report
    pub max_reported: NonZeroUsize,
    /// Ignore one trailing empty line on each side
    pub trim_trailing_newline: bool,
}

impl CompareOptions {
    pub fn with_max_reported(mut self, max_reported: NonZeroUsize) -> Self {
        self.max_reported = max_reported;
        self
    }

    pub fn with_trim_trailing_newline(mut self, trim: bool) -> Self {
        self.trim_trailing_newline = trim;
        self
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            max_reported: NonZeroUsize::new(DEFAULT_MAX_REPORTED).unwrap_or(NonZeroUsize::MIN),
            trim_trailing_newline: true,
        }
    }
}

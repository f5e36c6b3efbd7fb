//! Document comparison engine.
//!
//! The entry points are [`compare`], which walks two documents line by line
//! and produces a [`DiffReport`], and [`first_differing_offset`], which scans
//! the raw texts as flat character sequences.

use crate::diff::model::{
    CompareOptions, DiffEntry, DiffReport, Document, LineContent, OffsetContext,
};

/// Compare an actual document against an expected one.
///
/// Lines are compared by exact equality. An index past the end of one
/// document is reported as [`LineContent::Absent`] on that side. Entries are
/// collected in ascending line order until `max_reported` is reached; the
/// divergence count keeps going over the whole range.
///
/// This function is pure and total: any two documents, including empty ones,
/// produce a report.
pub fn compare(actual: &Document, expected: &Document, options: &CompareOptions) -> DiffReport {
    let actual_lines = actual.lines(options.trim_trailing_newline);
    let expected_lines = expected.lines(options.trim_trailing_newline);
    let line_count = actual_lines.len().max(expected_lines.len());
    let limit = options.max_reported.get();

    let mut entries = Vec::new();
    let mut total_divergent_lines = 0;

    for index in 0..line_count {
        let actual_line = actual_lines.get(index).copied();
        let expected_line = expected_lines.get(index).copied();
        if actual_line.is_some() && actual_line == expected_line {
            continue;
        }

        total_divergent_lines += 1;
        if entries.len() < limit {
            entries.push(divergent_entry(index + 1, actual_line, expected_line));
        }
    }

    let matches = total_divergent_lines == 0;
    let first_differing_offset = if matches {
        None
    } else {
        first_differing_offset(actual, expected)
    };

    tracing::debug!(
        actual_lines = actual_lines.len(),
        expected_lines = expected_lines.len(),
        total_divergent_lines,
        "compared documents"
    );

    DiffReport {
        matches,
        total_divergent_lines,
        entries,
        max_reported: limit,
        actual_line_count: actual_lines.len(),
        expected_line_count: expected_lines.len(),
        first_differing_offset,
    }
}

/// Find the first character at which two documents differ.
///
/// Offsets count Unicode scalar values, not bytes. When one document is a
/// strict prefix of the other, the offset is the shorter document's length.
/// Returns `None` only when the documents are identical.
pub fn first_differing_offset(actual: &Document, expected: &Document) -> Option<usize> {
    first_char_difference(actual.as_str(), expected.as_str())
}

/// Locate the first differing character and collect the text around it.
///
/// Each window spans up to `radius` characters before and after the offset,
/// clipped to the document. Returns `None` for identical documents.
pub fn offset_context(
    actual: &Document,
    expected: &Document,
    radius: usize,
) -> Option<OffsetContext> {
    let offset = first_differing_offset(actual, expected)?;

    let mut line = 1;
    let mut column = 0;
    for ch in expected.as_str().chars().take(offset) {
        if ch == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }

    let start = offset.saturating_sub(radius);
    let len = offset.saturating_add(radius) - start;
    let window = |doc: &Document| doc.as_str().chars().skip(start).take(len).collect::<String>();
    let line_at = |doc: &Document| LineContent::from_line(doc.lines(false).get(line - 1).copied());

    Some(OffsetContext {
        offset,
        line,
        column,
        actual_window: window(actual),
        expected_window: window(expected),
        actual_line: line_at(actual),
        expected_line: line_at(expected),
    })
}

fn divergent_entry(line: usize, actual: Option<&str>, expected: Option<&str>) -> DiffEntry {
    let column = match (actual, expected) {
        (Some(a), Some(e)) => first_char_difference(a, e),
        _ => None,
    };
    DiffEntry {
        line,
        actual: LineContent::from_line(actual),
        expected: LineContent::from_line(expected),
        column,
    }
}

fn first_char_difference(a: &str, b: &str) -> Option<usize> {
    if a == b {
        return None;
    }
    let mut a_chars = a.chars();
    let mut b_chars = b.chars();
    let mut index = 0;
    loop {
        match (a_chars.next(), b_chars.next()) {
            (Some(x), Some(y)) if x == y => index += 1,
            (None, None) => return None,
            _ => return Some(index),
        }
    }
}

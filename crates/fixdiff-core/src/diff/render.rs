//! Report renderers.

use crate::diff::model::{DiffReport, LineContent, OffsetContext};
use crate::errors::{ExError, ExErrorKind};

/// Render a human-readable report.
///
/// Line contents are shown Debug-quoted so that whitespace and carriage
/// returns stay visible.
pub fn render_text_report(report: &DiffReport) -> String {
    if report.matches {
        return "Documents match.\n".to_string();
    }

    let mut out = String::new();
    let plural = if report.total_divergent_lines == 1 { "" } else { "s" };
    out.push_str(&format!(
        "{} difference{} found",
        report.total_divergent_lines, plural
    ));
    if report.is_truncated() {
        out.push_str(&format!(", showing first {}", report.entries.len()));
    }
    out.push_str(".\n");

    if let Some(offset) = report.first_differing_offset {
        out.push_str(&format!("First differing character offset: {}\n", offset));
    }

    for entry in &report.entries {
        out.push('\n');
        match entry.column {
            Some(column) => out.push_str(&format!("line {}, column {}:\n", entry.line, column)),
            None => out.push_str(&format!("line {}:\n", entry.line)),
        }
        out.push_str(&format!("  actual:   {}\n", side(&entry.actual)));
        out.push_str(&format!("  expected: {}\n", side(&entry.expected)));
    }

    out.push_str("\nSummary:\n");
    out.push_str(&format!("  expected lines:    {}\n", report.expected_line_count));
    out.push_str(&format!("  actual lines:      {}\n", report.actual_line_count));
    out.push_str(&format!("  total differences: {}\n", report.total_divergent_lines));
    out
}

/// Render the surroundings of a first differing character.
pub fn render_offset_context(context: &OffsetContext) -> String {
    format!(
        "First difference at character {} (line {}, column {}).\n\
         \n\
         actual around difference:   {:?}\n\
         expected around difference: {:?}\n\
         \n\
         line {}:\n  \
         actual:   {}\n  \
         expected: {}\n",
        context.offset,
        context.line,
        context.column,
        context.actual_window,
        context.expected_window,
        context.line,
        side(&context.actual_line),
        side(&context.expected_line),
    )
}

/// Render the report as pretty-printed JSON.
///
/// # Errors
///
/// - `Serialization` if the report cannot be encoded
pub fn render_json_report(report: &DiffReport) -> Result<String, ExError> {
    serde_json::to_string_pretty(report).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("render_json_report")
            .with_message(e.to_string())
    })
}

fn side(content: &LineContent) -> String {
    match content {
        LineContent::Text(text) => format!("{:?}", text),
        LineContent::Absent => "<absent>".to_string(),
    }
}

//! End-to-end harness scenarios driving real child processes.
//!
//! `cat` stands in for a formatter that leaves its input untouched and
//! `sh -c` scripts stand in for formatters that rewrite or fail.

#![cfg(unix)]

use fixdiff_core::diff::{CompareOptions, Document, LineContent};
use fixdiff_core::errors::ExErrorKind;
use fixdiff_core::logging_facility::test_capture::init_test_capture;
use fixdiff_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_CASE, FIELD_DIVERGENT_LINES, FIELD_ERR_CODE,
    FIELD_MATCHES,
};
use fixdiff_harness::config::{load_config, parse_config};
use fixdiff_harness::{
    check_output, run_case, run_suite, HarnessError, RunOptions, ToolCommand, Verdict,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A suite with one passing case, one mismatching case and one case whose
/// expected file is missing.
fn setup_suite(temp: &TempDir, tool: &str) -> std::path::PathBuf {
    let dir = temp.path();
    write(dir, "fixtures/same.in", "<p>\n  hi\n</p>\n");
    write(dir, "fixtures/same.out", "<p>\n  hi\n</p>\n");
    write(dir, "fixtures/changed.in", "a: 1\nb: 2\n");
    write(dir, "fixtures/changed.out", "a: 1\nb: 3\n");
    write(dir, "fixtures/orphan.in", "x\n");

    let config = format!(
        r#"
[tool]
program = "sh"
args = ["-c", "{tool}"]

[[case]]
name = "same"
input = "fixtures/same.in"
expected = "fixtures/same.out"

[[case]]
name = "changed"
input = "fixtures/changed.in"
expected = "fixtures/changed.out"

[[case]]
name = "orphan"
input = "fixtures/orphan.in"
expected = "fixtures/orphan.out"
"#
    );
    write(dir, "fixdiff.toml", &config);
    dir.join("fixdiff.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_matching_case() {
    let temp = TempDir::new().unwrap();
    let config = load_config(&setup_suite(&temp, "cat")).unwrap();

    let outcome = run_case(&config, &config.cases[0], false).unwrap();
    assert_eq!(outcome.name, "same");
    assert!(outcome.report.matches);
    assert!(!outcome.blessed);
    assert_eq!(outcome.verdict(), Verdict::Match);
}

#[test]
fn test_mismatching_case_is_a_report_not_an_error() {
    let temp = TempDir::new().unwrap();
    let config = load_config(&setup_suite(&temp, "cat")).unwrap();

    let outcome = run_case(&config, &config.cases[1], false).unwrap();
    assert!(!outcome.report.matches);
    assert_eq!(outcome.report.total_divergent_lines, 1);
    assert_eq!(outcome.report.entries[0].line, 2);
    assert_eq!(
        outcome.report.entries[0].actual,
        LineContent::Text("b: 2".to_string())
    );
    assert_eq!(outcome.verdict(), Verdict::Mismatch);
}

#[test]
fn test_missing_expected_is_fixture_read_error() {
    let temp = TempDir::new().unwrap();
    let config = load_config(&setup_suite(&temp, "cat")).unwrap();

    let err = run_case(&config, &config.cases[2], false).unwrap_err();
    assert!(matches!(err, HarnessError::FixtureRead { .. }));
    assert_eq!(err.kind(), ExErrorKind::FixtureRead);
}

#[test]
fn test_suite_collects_every_case() {
    let temp = TempDir::new().unwrap();
    let config = load_config(&setup_suite(&temp, "cat")).unwrap();

    let suite = run_suite(&config, &RunOptions::default()).unwrap();
    let verdicts: Vec<Verdict> = suite.results.iter().map(|r| r.verdict()).collect();
    assert_eq!(
        verdicts,
        vec![Verdict::Match, Verdict::Mismatch, Verdict::Error]
    );
    assert_eq!(suite.verdict(), Verdict::Error);
    assert_eq!(suite.verdict().exit_code(), 2);
}

#[test]
fn test_suite_case_selection() {
    let temp = TempDir::new().unwrap();
    let config = load_config(&setup_suite(&temp, "cat")).unwrap();

    let options = RunOptions {
        cases: vec!["changed".to_string()],
        bless: false,
    };
    let suite = run_suite(&config, &options).unwrap();
    assert_eq!(suite.results.len(), 1);
    assert_eq!(suite.verdict(), Verdict::Mismatch);

    let options = RunOptions {
        cases: vec!["nope".to_string()],
        bless: false,
    };
    let err = run_suite(&config, &options).unwrap_err();
    assert!(matches!(err, HarnessError::UnknownCase { .. }));
}

#[test]
fn test_failing_tool_is_tool_failed_not_mismatch() {
    let temp = TempDir::new().unwrap();
    let config = load_config(&setup_suite(&temp, "echo parse error >&2; exit 4")).unwrap();

    let err = run_case(&config, &config.cases[0], false).unwrap_err();
    match err {
        HarnessError::ToolFailed {
            exit_code, stderr, ..
        } => {
            assert_eq!(exit_code, Some(4));
            assert!(stderr.contains("parse error"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_bless_rewrites_expected_and_creates_missing() {
    let temp = TempDir::new().unwrap();
    let config = load_config(&setup_suite(&temp, "cat")).unwrap();

    let options = RunOptions {
        cases: Vec::new(),
        bless: true,
    };
    let suite = run_suite(&config, &options).unwrap();
    assert_eq!(suite.verdict(), Verdict::Match);

    let changed = suite.results[1].outcome.as_ref().unwrap();
    assert!(changed.blessed);
    assert!(!changed.report.matches);

    let same = suite.results[0].outcome.as_ref().unwrap();
    assert!(!same.blessed);

    let dir = temp.path().join("fixtures");
    assert_eq!(
        fs::read_to_string(dir.join("changed.out")).unwrap(),
        "a: 1\nb: 2\n"
    );
    assert_eq!(fs::read_to_string(dir.join("orphan.out")).unwrap(), "x\n");

    // A second run without bless is now clean.
    let suite = run_suite(&config, &RunOptions::default()).unwrap();
    assert_eq!(suite.verdict(), Verdict::Match);
}

#[test]
fn test_bless_creates_missing_expected_for_empty_output() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "empty.in", "");
    let config = parse_config(
        r#"
[tool]
program = "cat"

[[case]]
name = "empty"
input = "empty.in"
expected = "empty.out"
"#,
        temp.path(),
    )
    .unwrap();

    let options = RunOptions {
        cases: Vec::new(),
        bless: true,
    };
    let suite = run_suite(&config, &options).unwrap();
    let outcome = suite.results[0].outcome.as_ref().unwrap();
    assert!(outcome.report.matches);
    assert!(outcome.blessed);
    assert_eq!(
        fs::read_to_string(temp.path().join("empty.out")).unwrap(),
        ""
    );

    let suite = run_suite(&config, &RunOptions::default()).unwrap();
    assert_eq!(suite.verdict(), Verdict::Match);
}

#[test]
fn test_actual_output_is_saved_on_every_run() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "in.txt", "a\nb\n");
    write(temp.path(), "out.txt", "a\nB\n");
    let config = parse_config(
        r#"
[tool]
program = "cat"

[[case]]
name = "saved"
input = "in.txt"
expected = "out.txt"
actual_output = "actual/saved.txt"
"#,
        temp.path(),
    )
    .unwrap();

    let outcome = run_case(&config, &config.cases[0], false).unwrap();
    assert!(!outcome.report.matches);
    let saved = temp.path().join("actual").join("saved.txt");
    assert_eq!(outcome.actual_saved.as_deref(), Some(saved.as_path()));
    assert_eq!(fs::read_to_string(&saved).unwrap(), "a\nb\n");
    // The expected file is left alone without bless.
    assert_eq!(
        fs::read_to_string(temp.path().join("out.txt")).unwrap(),
        "a\nB\n"
    );
}

#[test]
fn test_tool_runs_in_config_directory() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "prefix.txt", "> ");
    write(temp.path(), "in.txt", "line\n");
    write(temp.path(), "out.txt", "> line\n");
    let config = parse_config(
        r#"
[tool]
program = "sh"
args = ["-c", "printf '%s' \"$(cat prefix.txt)\"; cat"]

[[case]]
name = "prefixed"
input = "in.txt"
expected = "out.txt"
"#,
        temp.path(),
    )
    .unwrap();

    let outcome = run_case(&config, &config.cases[0], false).unwrap();
    assert!(outcome.report.matches, "{:?}", outcome.report);
}

#[test]
fn test_check_output_without_config() {
    let check = check_output(
        &ToolCommand::new("tr").arg("a-z").arg("A-Z"),
        "abc\n",
        &Document::new("ABC"),
        &CompareOptions::default(),
    )
    .unwrap();
    assert!(check.report.matches);
    assert_eq!(check.output.stdout, "ABC\n");

    let check = check_output(
        &ToolCommand::new("tr").arg("a-z").arg("A-Z"),
        "abc\n",
        &Document::new("ABD"),
        &CompareOptions::default(),
    )
    .unwrap();
    assert!(!check.report.matches);
    assert_eq!(check.report.entries[0].column, Some(2));
}

#[test]
fn test_run_case_lifecycle_events() {
    let capture = init_test_capture();
    let temp = TempDir::new().unwrap();
    write(temp.path(), "in.txt", "a\nb\n");
    write(temp.path(), "out.txt", "a\nB\n");
    // Case names are unique to this test because the capture is shared.
    let config = parse_config(
        r#"
[tool]
program = "cat"

[[case]]
name = "lifecycle_changed"
input = "in.txt"
expected = "out.txt"

[[case]]
name = "lifecycle_orphan"
input = "in.txt"
expected = "missing.txt"
"#,
        temp.path(),
    )
    .unwrap();

    run_case(&config, &config.cases[0], false).unwrap();
    let _ = run_case(&config, &config.cases[1], false);

    assert!(capture
        .events_for("run_case", EVENT_START)
        .iter()
        .any(|e| e.field(FIELD_CASE) == Some("lifecycle_changed")));

    let changed_end = capture
        .events_for("run_case", EVENT_END)
        .into_iter()
        .find(|e| e.field(FIELD_CASE) == Some("lifecycle_changed"))
        .expect("end event for changed case");
    assert_eq!(changed_end.field(FIELD_MATCHES), Some("false"));
    assert_eq!(changed_end.field(FIELD_DIVERGENT_LINES), Some("1"));

    let orphan_error = capture
        .events_for("run_case", EVENT_END_ERROR)
        .into_iter()
        .find(|e| e.field(FIELD_CASE) == Some("lifecycle_orphan"))
        .expect("error event for orphan case");
    assert_eq!(orphan_error.field(FIELD_ERR_CODE), Some("ERR_FIXTURE_READ"));
}

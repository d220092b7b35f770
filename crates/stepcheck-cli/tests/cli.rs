//! End-to-end tests for the `stepcheck` binary.

use std::fs;
use std::path::Path;
use std::str;

use assert_cmd::Command;
use rstest::{fixture, rstest};
use tempfile::TempDir;

fn stepcheck() -> Command {
    Command::cargo_bin("stepcheck").unwrap_or_else(|err| panic!("binary exists: {err}"))
}

fn stdout_of(output: &std::process::Output) -> &str {
    str::from_utf8(&output.stdout).unwrap_or_else(|err| panic!("utf8 stdout: {err}"))
}

fn stderr_of(output: &std::process::Output) -> &str {
    str::from_utf8(&output.stderr).unwrap_or_else(|err| panic!("utf8 stderr: {err}"))
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap_or_else(|err| panic!("write {name}: {err}"));
    path.display().to_string()
}

#[fixture]
fn workspace() -> TempDir {
    TempDir::new().unwrap_or_else(|err| panic!("temp dir: {err}"))
}

#[test]
fn assert_passes_and_prints_summary() {
    let output = stepcheck()
        .args(["assert", "total:decimal", ">=", "42.5", "--actual", "\"42.50\""])
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("[passed] value at 'total'"));
    assert!(stdout.ends_with("1 check(s): 1 passed, 0 failed\n"));
}

#[test]
fn assert_mismatch_exits_non_zero() {
    let output = stepcheck()
        .args(["assert", "status", "=", "Paid", "--actual", "Pending"])
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert!(!output.status.success());
    assert!(stdout_of(&output).starts_with("[failed] value at 'status'"));
    assert!(stderr_of(&output).contains("assertion failed"));
}

#[test]
fn assert_reports_unknown_operator_without_outcome() {
    let output = stepcheck()
        .args(["assert", "status", "~=", "Paid", "--actual", "Paid"])
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr_of(&output).contains("unknown comparison operator '~='"));
}

#[test]
fn assert_emits_json_report() {
    let output = stepcheck()
        .args([
            "assert",
            "#tags",
            "contains",
            r#"{"ev": ["b"]}"#,
            "--actual",
            r#"["a", "b"]"#,
            "--element",
            "--format",
            "json",
        ])
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(stdout_of(&output).trim_end())
        .unwrap_or_else(|err| panic!("json: {err}"));
    assert_eq!(report["passed"], serde_json::json!(1));
    assert_eq!(report["checks"][0]["origin"], serde_json::json!("element"));
}

#[rstest]
#[case(&["check", "status", "=", "Paid", "--actual", "Paid"], "true\n")]
#[case(&["check", "status", "=", "Paid", "--actual", "Due"], "false\n")]
#[case(&["check", "status", "~=", "Paid", "--actual", "Paid"], "false\n")]
#[case(&["check", "missing", "not-present"], "true\n")]
fn check_prints_verdict(#[case] args: &[&str], #[case] expected: &str) {
    let output = stepcheck()
        .args(args)
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), expected);
}

#[rstest]
#[case("yes", "false\n")]
#[case("1", "false\n")]
#[case("off", "true\n")]
#[case("sometimes", "true\n")]
fn environment_decides_empty_list_presence(#[case] value: &str, #[case] expected: &str) {
    let output = stepcheck()
        .env("STEPCHECK_EMPTY_LIST_IS_ABSENT", value)
        .args(["check", "tags", "present", "--actual", "[]"])
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), expected);
}

#[test]
fn flag_overrides_environment() {
    let output = stepcheck()
        .env("STEPCHECK_EMPTY_LIST_IS_ABSENT", "yes")
        .args([
            "check",
            "tags",
            "present",
            "--actual",
            "[]",
            "--empty-list-is-absent",
            "false",
        ])
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert_eq!(stdout_of(&output), "true\n");
}

#[rstest]
fn check_reads_paths_from_document(workspace: TempDir) {
    let document = write(
        workspace.path(),
        "order.json",
        r#"{"lines": [{"sku": "TEA"}, {"sku": "CAKE"}]}"#,
    );
    let output = stepcheck()
        .args(["check", "lines[*].sku", "contains", "CAKE", "--document", &document])
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "true\n");
}

#[rstest]
fn batch_runs_every_row(workspace: TempDir) {
    let document = write(
        workspace.path(),
        "order.json",
        r#"{"status": "Paid", "total": 42.5, "notes": []}"#,
    );
    let table = write(
        workspace.path(),
        "checks.table",
        "| path | operator | expected |\n\
         | status | = | paid-ignored |\n",
    );
    let output = stepcheck()
        .args(["batch", "--document", &document, "--table", &table])
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("check 1 (status) failed"));

    let table = write(
        workspace.path(),
        "passing.table",
        "# order checks\n\
         | status | = | Paid |\n\
         | total | > | 40 |\n\
         | notes | present | |\n",
    );
    let output = stepcheck()
        .args([
            "batch",
            "--document",
            &document,
            "--table",
            &table,
            "--empty-list-is-absent",
            "false",
        ])
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert!(output.status.success(), "{}", stderr_of(&output));
    assert!(stdout_of(&output).ends_with("3 check(s): 3 passed, 0 failed\n"));
}

#[rstest]
fn batch_stops_at_first_failure(workspace: TempDir) {
    let document = write(workspace.path(), "doc.json", r#"{"a": 1, "b": 2}"#);
    let table = write(
        workspace.path(),
        "checks.table",
        "| a | = | 1 |\n| b | < | 2 |\n| c | ~~ | 3 |\n",
    );
    let output = stepcheck()
        .args(["batch", "--document", &document, "--table", &table])
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("check 2 (b) failed"));
    assert!(!stderr.contains("~~"));
}

#[test]
fn operators_lists_builtin_tokens() {
    let output = stepcheck()
        .arg("operators")
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.lines().any(|line| line == "<> -> !="));
    assert!(stdout.lines().any(|line| line == "notexists -> not-present"));
}

#[test]
fn strategies_lists_builtin_names() {
    let output = stepcheck()
        .arg("strategies")
        .output()
        .unwrap_or_else(|err| panic!("runs: {err}"));
    assert!(output.status.success());
    assert!(
        stdout_of(&output)
            .lines()
            .any(|line| line == "startswith -> starts-with")
    );
}

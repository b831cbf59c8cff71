use assert_cmd::Command;
use predicates::prelude::*;

fn havlak() -> Command {
    Command::cargo_bin("havlak-rs").unwrap()
}

#[test]
fn test_generate_reports_shape() {
    havlak()
        .args([
            "generate",
            "--segments",
            "1",
            "--iterations",
            "2",
            "--base-loops",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Basic blocks: 28"))
        .stdout(predicate::str::contains("Edges: 39"));
}

#[test]
fn test_analyze_reports_loop_count() {
    havlak()
        .args([
            "analyze",
            "--segments",
            "1",
            "--iterations",
            "2",
            "--base-loops",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "# of loops: 9 (including 1 artificial root node)",
        ));
}

#[test]
fn test_analyze_json_is_valid() {
    let output = havlak()
        .args([
            "analyze",
            "--segments",
            "1",
            "--iterations",
            "2",
            "--base-loops",
            "1",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["loop_count"], 9);
    assert_eq!(summary["dead_blocks"], 0);
    assert_eq!(summary["loops"][0]["is_root"], true);
}

#[test]
fn test_analyze_rejects_unknown_format() {
    havlak()
        .args([
            "analyze",
            "--segments",
            "1",
            "--iterations",
            "1",
            "--base-loops",
            "1",
            "--format",
            "yaml",
        ])
        .assert()
        .failure();
}

#[test]
fn test_bench_reports_stable_count() {
    havlak()
        .args([
            "bench",
            "--segments",
            "1",
            "--iterations",
            "2",
            "--base-loops",
            "1",
            "--runs",
            "3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "# of loops: 9 (including 1 artificial root node)",
        ));
}

#[test]
fn test_generate_writes_dot_file() {
    let dir = tempfile::tempdir().unwrap();
    let dot_path = dir.path().join("cfg.dot");

    havlak()
        .args([
            "generate",
            "--segments",
            "1",
            "--iterations",
            "1",
            "--base-loops",
            "1",
        ])
        .arg("--dot")
        .arg(&dot_path)
        .assert()
        .success();

    let dot = std::fs::read_to_string(&dot_path).unwrap();
    assert!(dot.starts_with("digraph CFG {"));
    assert!(dot.contains("->"));
}

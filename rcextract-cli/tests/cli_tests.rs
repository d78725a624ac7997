//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn rcextract_cli() -> Command {
    cargo_bin_cmd!("rcextract")
}

fn write_geometry(json: &str) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), json).unwrap();
    file
}

const SINGLE_WIRE: &str = r#"[
    {
        "net_name": "CLK",
        "segment_number": 0,
        "layer_name": "M1",
        "rect": {"ll": {"x": 0.0, "y": 0.0}, "ur": {"x": 100.0, "y": 10.0}},
        "p1": {"x": 0.0, "y": 5.0},
        "p2": {"x": 100.0, "y": 5.0}
    }
]"#;

#[test]
fn test_cli_help() {
    let mut cmd = rcextract_cli();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("extraction"));
}

#[test]
fn test_cli_version() {
    let mut cmd = rcextract_cli();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_extract_text_output() {
    let file = write_geometry(SINGLE_WIRE);
    let mut cmd = rcextract_cli();
    cmd.arg("extract").arg(file.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Resistor<node1='CLK{0}'"));
}

#[test]
fn test_cli_extract_json_output() {
    let file = write_geometry(SINGLE_WIRE);
    let mut cmd = rcextract_cli();
    cmd.arg("extract").arg(file.path()).arg("--format").arg("json");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"resistors\""))
        .stdout(predicate::str::contains("\"capacitors\""));
}

#[test]
fn test_cli_extract_writes_to_output_file() {
    let file = write_geometry(SINGLE_WIRE);
    let out = NamedTempFile::new().unwrap();
    let mut cmd = rcextract_cli();
    cmd.arg("extract")
        .arg(file.path())
        .arg("--output")
        .arg(out.path());
    cmd.assert().success();
    let written = std::fs::read_to_string(out.path()).unwrap();
    assert!(written.contains("Resistor<node1='CLK{0}'"));
}

#[test]
fn test_cli_extract_nonexistent_file() {
    let mut cmd = rcextract_cli();
    cmd.arg("extract").arg("does_not_exist.json");
    cmd.assert().failure().stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_extract_malformed_file() {
    let file = write_geometry("not json");
    let mut cmd = rcextract_cli();
    cmd.arg("extract").arg(file.path());
    cmd.assert().failure().stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_validate_reports_counts() {
    let file = write_geometry(SINGLE_WIRE);
    let mut cmd = rcextract_cli();
    cmd.arg("validate").arg(file.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 segments across 1 nets"));
}

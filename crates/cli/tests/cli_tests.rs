//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "rds-rightsize-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Right-sizing recommendations"),
        "Should show app description"
    );
    assert!(stdout.contains("analyze"), "Should show analyze command");
    assert!(stdout.contains("catalog"), "Should show catalog command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "rds-rightsize-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("rds-rightsize"), "Should show binary name");
}

/// Test analyze subcommand help lists every threshold flag
#[test]
fn test_analyze_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "rds-rightsize-cli", "--", "analyze", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "analyze help should succeed");
    assert!(stdout.contains("--cpu-upsize"), "Should show cpu-upsize flag");
    assert!(stdout.contains("--cpu-downsize"), "Should show cpu-downsize flag");
    assert!(stdout.contains("--mem-upsize"), "Should show mem-upsize flag");
    assert!(stdout.contains("--period"), "Should show period flag");
    assert!(stdout.contains("--tags"), "Should show tags flag");
    assert!(stdout.contains("--stat"), "Should show stat flag");
}

/// Inverted CPU thresholds must be rejected before anything runs
#[test]
fn test_analyze_rejects_inverted_thresholds() {
    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "rds-rightsize-cli",
            "--",
            "analyze",
            "--cpu-upsize",
            "30",
            "--cpu-downsize",
            "75",
        ])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "inverted thresholds should fail");
    assert!(
        stderr.contains("cpu-downsize"),
        "Should name the offending threshold"
    );
}

/// Catalog validation against a local file catches a dangling link
#[test]
fn test_catalog_validate_flags_dangling_link() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.json");
    std::fs::write(
        &path,
        r#"{"db.r5.large": {"vcpu": 2, "mem": 16, "stdPrice": 0.25, "up": "db.r5.xlarge"}}"#,
    )
    .unwrap();

    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "rds-rightsize-cli",
            "--",
            "--instance-types",
            path.to_str().unwrap(),
            "catalog",
            "validate",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "dangling link should fail validation");
}

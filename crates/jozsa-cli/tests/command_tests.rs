//! End-to-end tests that run the `jozsa` binary.
//!
//! Each command gets an empty config file and a scratch home directory, and
//! every `JOZSA_*` override is cleared, so only the flags under test apply.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const ENV_OVERRIDES: &[&str] = &[
    "JOZSA_SHOTS",
    "JOZSA_BACKEND",
    "JOZSA_TARGET",
    "JOZSA_SEED",
    "JOZSA_LOG_LEVEL",
    "JOZSA_MAX_QUBITS",
];

fn scratch_home() -> TempDir {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("config.yaml"), "").unwrap();
    home
}

fn jozsa(home: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_jozsa"));
    cmd.arg("--config")
        .arg(home.join("config.yaml"))
        .args(args)
        .env("HOME", home)
        .env("NO_COLOR", "1");
    for var in ENV_OVERRIDES {
        cmd.env_remove(var);
    }
    cmd.output().expect("failed to run jozsa")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_exits_zero() {
    let home = scratch_home();
    let output = jozsa(home.path(), &["check"]);

    assert!(output.status.success(), "check failed: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("All oracles classified correctly"), "{out}");
    assert!(out.contains("CONSTANT"));
    assert!(out.contains("BALANCED"));
}

#[test]
fn test_check_rejects_oversized_config_limit() {
    let home = scratch_home();
    std::fs::write(home.path().join("config.yaml"), "max_qubits: 64\n").unwrap();
    let output = jozsa(home.path(), &["check"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("max_qubits"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_balanced_json() {
    let home = scratch_home();
    let output = jozsa(
        home.path(),
        &["run", "-n", "3", "--oracle", "balanced", "--seed", "1", "--format", "json"],
    );

    assert!(output.status.success(), "run failed: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["classification"], "balanced");
    assert_eq!(json["expected"], "balanced");
    assert_eq!(json["num_qubits"], 3);
    assert_eq!(json["result"]["counts"]["111"], 1024);
}

#[test]
fn test_run_constant_table() {
    let home = scratch_home();
    let output = jozsa(
        home.path(),
        &["run", "-n", "2", "--oracle", "constant1", "--shots", "64"],
    );

    assert!(output.status.success(), "run failed: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("CONSTANT"), "{out}");
    assert!(out.contains("matches oracle"));
}

#[test]
fn test_run_unknown_format_exits_one() {
    let home = scratch_home();
    let output = jozsa(home.path(), &["run", "--format", "xml"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown format"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_run_unknown_backend_exits_one() {
    let home = scratch_home();
    let output = jozsa(home.path(), &["run", "--backend", "quantinuum"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown backend"));
}

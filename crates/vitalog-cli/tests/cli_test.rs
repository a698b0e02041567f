//! End-to-end CLI tests in guest mode (no remote configured), each against
//! an isolated data directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vitalog(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vitalog").expect("binary builds");
    cmd.env("VITALOG_PATH", data_dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn record_checkup(data_dir: &TempDir, sleep: &str, stress: &str) {
    vitalog(data_dir)
        .args([
            "checkup", "--sleep", sleep, "--water", "5", "--stress", stress, "--energy", "6",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved locally."));
}

#[test]
fn help_lists_core_commands() {
    Command::cargo_bin("vitalog")
        .expect("binary builds")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("checkup"))
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("reminder"));
}

#[test]
fn status_starts_in_guest_mode() {
    let dir = TempDir::new().expect("tempdir");
    vitalog(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("guest"))
        .stdout(predicate::str::contains("records:  0"));
}

#[test]
fn checkup_then_history_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    record_checkup(&dir, "7.5", "4");

    vitalog(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("7.5"))
        .stdout(predicate::str::contains("1 entry"));
}

#[test]
fn query_filters_history() {
    let dir = TempDir::new().expect("tempdir");
    record_checkup(&dir, "8", "2");
    record_checkup(&dir, "5", "9");

    vitalog(&dir)
        .args(["query", "WHERE stress > 5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 entry"));

    vitalog(&dir)
        .args(["query", "SELECT * FROM health_history ORDER BY sleep ASC LIMIT 1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 entry"));
}

#[test]
fn malformed_query_fails_with_syntax_error() {
    let dir = TempDir::new().expect("tempdir");
    record_checkup(&dir, "8", "2");

    vitalog(&dir)
        .args(["query", "WHERE stress >"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("query syntax error"));
}

#[test]
fn export_writes_csv_header() {
    let dir = TempDir::new().expect("tempdir");
    record_checkup(&dir, "6", "3");

    vitalog(&dir)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "id,timestamp,sleep,water,stress,energy,discomfort,food_quality",
        ));
}

#[test]
fn reminder_lifecycle() {
    let dir = TempDir::new().expect("tempdir");

    let output = vitalog(&dir)
        .args([
            "reminder", "add", "--label", "Morning Vitamins", "--time", "08:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Morning Vitamins"))
        .get_output()
        .stdout
        .clone();

    // "Added reminder <id> (...)"
    let stdout = String::from_utf8(output).expect("utf8");
    let id = stdout
        .split_whitespace()
        .nth(2)
        .expect("id in add output")
        .to_string();

    vitalog(&dir)
        .args(["reminder", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("on "))
        .stdout(predicate::str::contains("08:00"));

    vitalog(&dir)
        .args(["reminder", "toggle", &id])
        .assert()
        .success();

    vitalog(&dir)
        .args(["reminder", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("off"));

    vitalog(&dir)
        .args(["reminder", "remove", &id])
        .assert()
        .success();

    vitalog(&dir)
        .args(["reminder", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No reminders configured."));
}

#[test]
fn auth_commands_require_a_configured_backend() {
    let dir = TempDir::new().expect("tempdir");
    vitalog(&dir)
        .args(["login", "--email", "ada@example.com", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no remote backend configured"));
}

#[test]
fn invalid_stress_value_is_rejected_by_the_parser() {
    let dir = TempDir::new().expect("tempdir");
    vitalog(&dir)
        .args([
            "checkup", "--sleep", "7", "--water", "5", "--stress", "11", "--energy", "6",
        ])
        .assert()
        .failure();
}

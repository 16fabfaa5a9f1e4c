use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("competia").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Terminal client"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("training"));
}

#[test]
fn test_report_help_lists_all_report_types() {
    let mut cmd = Command::cargo_bin("competia").unwrap();
    cmd.arg("report").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("competitor"))
        .stdout(predicate::str::contains("modality"))
        .stdout(predicate::str::contains("attendance"))
        .stdout(predicate::str::contains("ranking"))
        .stdout(predicate::str::contains("training-hours"))
        .stdout(predicate::str::contains("general"));
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("competia").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_completions_command() {
    let mut cmd = Command::cargo_bin("competia").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_competia"));
}

#[test]
fn test_logout_clears_stored_session() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[auth]\ntoken = \"access\"\nrefresh_token = \"refresh\"\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("competia").unwrap();
    cmd.env("COMPETIA_CONFIG_DIR", dir.path()).arg("logout");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Logged out of Competia"))
        .stdout(predicate::str::contains("Session cleared from"));

    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("token = \"\""));
}

#[test]
fn test_logout_without_session() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("competia").unwrap();
    cmd.env("COMPETIA_CONFIG_DIR", dir.path()).arg("logout");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("You are not logged in."));
}

#[test]
fn test_training_validate_rejects_conflicting_flags() {
    let mut cmd = Command::cargo_bin("competia").unwrap();
    cmd.arg("training")
        .arg("validate")
        .arg("c9a6dfb2-3f68-4f58-b8e9-1f2d3c4b5a69")
        .arg("--approve")
        .arg("--reject");

    cmd.assert().failure();
}

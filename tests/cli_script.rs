use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::{tempdir, TempDir};

/// Isolated application directory with colour turned off.
fn home() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.json"), r#"{ "color": false }"#).unwrap();
    dir
}

fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("panel_wizard_cli").unwrap();
    cmd.env("PANEL_WIZARD_CLI_SCRIPT", "1")
        .env("PANEL_WIZARD_HOME", home)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_completes_questionnaire() {
    let home = home();
    let input = [
        "status",
        "click start",
        "wait",
        "submit name Ada",
        "wait",
        "blur city \"San Jose\"",
        "blur state CA",
        "wait",
        "submit team \"Golden State\"",
        "wait",
        "radio excitement very",
        "wait",
        "radio coffee tea",
        "radio weekend beach",
        "wait",
        "submit age 42",
        "wait",
        "submit agree Yes",
        "flags",
        "exit",
    ]
    .join("\n");

    cli(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Now on Panel 1 (Welcome)"))
        .stdout(contains("Panel 1 passed!"))
        .stdout(contains("Panel 5 (Good answer) is now shown"))
        .stdout(contains("Now on Panel 5 (Good answer)"))
        .stdout(contains("isDope = yes"))
        .stdout(contains("Progress: 8/8"))
        .stdout(contains("`Warriors questionnaire` complete."));
}

#[test]
fn script_mode_reports_validation_and_navigation_problems() {
    let home = home();
    let input = "next\nsubmit name \"\"\nclick nowhere\nstauts\nexit\n";

    cli(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Panel 1 is not complete yet."))
        .stdout(contains("`name` rejected: This field is required."))
        .stdout(contains("Panel 2 failed: This field is required."))
        .stdout(contains("No field named `nowhere` in this wizard."))
        .stdout(contains("Suggestion: `status`?"));
}

#[test]
fn config_set_is_persisted() {
    let home = home();
    cli(home.path())
        .write_stdin("config set advance_delay_ms 100\nconfig set navigation sequential\nexit\n")
        .assert()
        .success()
        .stdout(contains("Updated `advance_delay_ms`"));

    let saved = fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(saved.contains("\"advance_delay_ms\": 100"));
    assert!(saved.contains("\"navigation\": \"sequential\""));
    assert!(saved.contains("\"color\": false"));
}

#[test]
fn definition_path_argument_replaces_questionnaire() {
    let home = home();
    let definition = home.path().join("tiny.json");
    fs::write(
        &definition,
        r#"{
            "name": "tiny",
            "fields": [{ "id": "ok" }],
            "panels": [{ "title": "Only step", "advance": "affirm", "fields": ["ok"] }]
        }"#,
    )
    .unwrap();

    cli(home.path())
        .arg(&definition)
        .write_stdin("status\nclick ok\nexit\n")
        .assert()
        .success()
        .stdout(contains("1. Only step [ok]"))
        .stdout(contains("`tiny` complete."));
}

#[test]
fn unreadable_definition_fails_startup() {
    let home = home();
    cli(home.path())
        .arg(home.path().join("missing.json"))
        .write_stdin("exit\n")
        .assert()
        .failure()
        .stderr(contains("Error:"));
}

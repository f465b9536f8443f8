#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn medlog_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("medlog"));
    cmd.env("MEDLOG_DATA_DIR", data_dir.as_os_str())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn list_output(data_dir: &Path) -> String {
    let output = medlog_cmd(data_dir).arg("list").output().unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_first_run_lists_default_medicines() {
    let temp = TempDir::new().unwrap();

    medlog_cmd(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Vitamin C"))
        .stdout(predicate::str::contains("2. Vitamin D"));

    assert!(temp.path().join("mediLog_medicines.json").exists());
}

#[test]
fn test_add_and_reject_duplicate() {
    let temp = TempDir::new().unwrap();

    medlog_cmd(temp.path())
        .args(["add", "Fish", "Oil"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Medicine added: Fish Oil"));

    medlog_cmd(temp.path())
        .args(["add", "  fish oil "])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Medicine with this name already exists.",
        ));

    let listed = list_output(temp.path());
    assert_eq!(listed.matches("Fish Oil").count(), 1);
    assert!(listed.contains("3. Fish Oil"));
}

#[test]
fn test_remove_and_move() {
    let temp = TempDir::new().unwrap();
    medlog_cmd(temp.path())
        .args(["add", "Zinc"])
        .assert()
        .success();

    // [Vitamin C, Vitamin D, Zinc] -> [Vitamin D, Zinc, Vitamin C]
    medlog_cmd(temp.path())
        .args(["move", "1", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Medicine order saved."));

    let listed = list_output(temp.path());
    assert!(listed.contains("1. Vitamin D"));
    assert!(listed.contains("2. Zinc"));
    assert!(listed.contains("3. Vitamin C"));

    medlog_cmd(temp.path())
        .args(["rm", "zinc"])
        .assert()
        .success();
    assert!(!list_output(temp.path()).contains("Zinc"));

    medlog_cmd(temp.path())
        .args(["move", "1", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_take_and_history() {
    let temp = TempDir::new().unwrap();

    medlog_cmd(temp.path())
        .args([
            "take",
            "vitamin",
            "d",
            "--date",
            "2024-05-06",
            "--time",
            "08:30",
            "--details",
            " 1000 IU ",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Intake recorded: Vitamin D"));

    medlog_cmd(temp.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday, May 6, 2024"))
        .stdout(predicate::str::contains("Vitamin D (1000 IU)"));

    medlog_cmd(temp.path())
        .args(["config", "clock", "24h"])
        .assert()
        .success();
    medlog_cmd(temp.path())
        .args(["history", "--day", "2024-05-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("08:30"));

    medlog_cmd(temp.path())
        .args(["take", "Aspirin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No medicine matches"));

    medlog_cmd(temp.path())
        .args(["forget", "1"])
        .assert()
        .success();
    medlog_cmd(temp.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No intake records."));
}

#[test]
fn test_take_without_time_records_whole_minutes() {
    let temp = TempDir::new().unwrap();
    medlog_cmd(temp.path())
        .args(["take", "1"])
        .assert()
        .success();

    let output = medlog_cmd(temp.path())
        .args(["export", "--stdout"])
        .output()
        .unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let timestamp = doc["intakeRecords"][0]["timestamp"].as_i64().unwrap();
    assert_eq!(timestamp % 60_000, 0);
}

#[test]
fn test_calendar_marks_month() {
    let temp = TempDir::new().unwrap();
    medlog_cmd(temp.path())
        .args(["take", "1", "--date", "2024-05-06", "--time", "12:00"])
        .assert()
        .success();

    medlog_cmd(temp.path())
        .args(["calendar", "--month", "2024-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("May 2024"))
        .stdout(predicate::str::contains("1 day with intake records"));

    medlog_cmd(temp.path())
        .args(["calendar", "--month", "2024-13"])
        .assert()
        .failure();
}

#[test]
fn test_export_import_round_trip() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    let export = temp.path().join("backup.json");

    medlog_cmd(&source)
        .args(["add", "Magnesium"])
        .assert()
        .success();
    medlog_cmd(&source)
        .args(["take", "Magnesium", "--details", "200mg"])
        .assert()
        .success();
    medlog_cmd(&source)
        .args(["export", "--output", export.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 medicines and 1 intake records"));

    medlog_cmd(&target)
        .args(["import", export.to_str().unwrap()])
        .assert()
        .success();

    assert!(list_output(&target).contains("3. Magnesium"));
    medlog_cmd(&target)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Magnesium (200mg)"));

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(exported["intakeRecords"][0]["details"], "200mg");
}

#[test]
fn test_export_defaults_to_configured_filename() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");

    medlog_cmd(&data)
        .current_dir(temp.path())
        .arg("export")
        .assert()
        .success();
    assert!(temp.path().join("medilog-export.json").exists());

    medlog_cmd(&data)
        .args(["config", "export-filename", "mine.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("export-filename set to mine.json"));
    medlog_cmd(&data)
        .current_dir(temp.path())
        .arg("export")
        .assert()
        .success();
    assert!(temp.path().join("mine.json").exists());
}

#[test]
fn test_export_to_stdout_is_json() {
    let temp = TempDir::new().unwrap();
    let output = medlog_cmd(temp.path())
        .args(["export", "--stdout"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["medicines"][0]["name"], "Vitamin C");
    assert_eq!(doc["intakeRecords"], serde_json::json!([]));
}

#[test]
fn test_import_rejects_wrong_shape() {
    let temp = TempDir::new().unwrap();
    let bad = temp.path().join("bad.json");
    fs::write(&bad, r#"{"foo": 1}"#).unwrap();

    medlog_cmd(temp.path())
        .args(["add", "Zinc"])
        .assert()
        .success();
    medlog_cmd(temp.path())
        .args(["import", bad.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Import failed"));

    assert!(list_output(temp.path()).contains("3. Zinc"));
}

#[test]
fn test_clear_reseeds() {
    let temp = TempDir::new().unwrap();
    medlog_cmd(temp.path())
        .args(["add", "Zinc"])
        .assert()
        .success();
    medlog_cmd(temp.path())
        .args(["take", "zinc"])
        .assert()
        .success();

    // Declining keeps everything
    medlog_cmd(temp.path())
        .arg("clear")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing was deleted."));
    assert!(list_output(temp.path()).contains("Zinc"));

    medlog_cmd(temp.path())
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All data cleared."));

    let listed = list_output(temp.path());
    assert!(!listed.contains("Zinc"));
    assert!(listed.contains("1. Vitamin C"));
    medlog_cmd(temp.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No intake records."));
}

#[test]
fn test_corrupt_data_is_reported_and_reset() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("mediLog_medicines.json"), "not json").unwrap();

    medlog_cmd(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("could not be fully read"))
        .stdout(predicate::str::contains("1. Vitamin C"));
}

#[test]
fn test_data_dir_flag_overrides_env() {
    let temp = TempDir::new().unwrap();
    let flagged = temp.path().join("flagged");

    medlog_cmd(temp.path())
        .args(["--data-dir", flagged.to_str().unwrap(), "add", "Iron"])
        .assert()
        .success();

    assert!(flagged.join("mediLog_medicines.json").exists());
    assert!(!list_output(temp.path()).contains("Iron"));
}

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

const THREE_PLAYERS: &str = r#"
players: 3
seats:
  north: { name: dariya, pool: 56, mountain: 22, whists: { east: 24, south: 32 } }
  east:  { name: kolya, pool: "22", mountain: " 22", whists: { north: 100, south: 32 } }
  south: { name: fedya, pool: 12, mountain: 34, whists: { north: 72, east: 56 } }
"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn prefcount(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("prefcount").expect("binary built");
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn prints_ranked_text_report() {
    let dir = tempdir().unwrap();
    let sheet = write(dir.path(), "game.yaml", THREE_PLAYERS);

    prefcount(&dir)
        .arg(&sheet)
        .arg("--no-adjustment")
        .assert()
        .success()
        .stdout(predicate::str::contains("Final scores (3 players, leningrad, adjustment off)"))
        .stdout(predicate::str::contains("average 56.00"))
        .stdout(predicate::str::is_match(r" 1  East\s+kolya").unwrap());
}

#[test]
fn json_report_matches_engine_fixture() {
    let dir = tempdir().unwrap();
    let sheet = write(dir.path(), "game.yaml", THREE_PLAYERS);

    let output = prefcount(&dir)
        .args(["--format", "json", "--variant", "sochi", "--no-adjustment"])
        .arg(&sheet)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["rules"]["variant"], "sochi");
    assert_eq!(value["scoreboard"]["standings"][0]["seat"], "East");
    assert_eq!(value["settlement"]["average_mountain"], 3000);
    assert_eq!(value["settlement"]["seats"][0]["seat"], "North");
    assert_eq!(value["settlement"]["seats"][0]["final_score"], 184);
}

#[test]
fn incomplete_sheet_fails_with_seat_and_field() {
    let dir = tempdir().unwrap();
    let sheet = write(
        dir.path(),
        "game.yaml",
        &THREE_PLAYERS.replace("mountain: \" 22\", ", ""),
    );

    prefcount(&dir)
        .arg(&sheet)
        .assert()
        .failure()
        .stderr(predicate::str::contains("East: mountain is missing"));
}

#[test]
fn malformed_number_is_reported() {
    let dir = tempdir().unwrap();
    let sheet = write(
        dir.path(),
        "game.yaml",
        &THREE_PLAYERS.replace("pool: 12", "pool: \"-12\""),
    );

    prefcount(&dir)
        .arg(&sheet)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "South: pool is not a non-negative whole number",
        ));
}

#[test]
fn unquoted_negative_number_is_reported() {
    let dir = tempdir().unwrap();
    let sheet = write(
        dir.path(),
        "game.yaml",
        &THREE_PLAYERS.replace("pool: 12", "pool: -12"),
    );

    prefcount(&dir)
        .arg(&sheet)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "South: pool is not a non-negative whole number",
        ));
}

#[test]
fn config_file_selects_rules() {
    let dir = tempdir().unwrap();
    let sheet = write(dir.path(), "game.yaml", THREE_PLAYERS);
    write(
        dir.path(),
        "prefcount.yaml",
        "rules:\n  variant: sochi\n  mountain_adjustment:\n    enabled: false\n",
    );

    prefcount(&dir)
        .arg(&sheet)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 players, sochi, adjustment off"));
}

#[test]
fn adjustment_seat_outside_table_is_rejected() {
    let dir = tempdir().unwrap();
    let sheet = write(dir.path(), "game.yaml", THREE_PLAYERS);

    prefcount(&dir)
        .arg(&sheet)
        .args(["--adjust-seat", "west"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rules.mountain_adjustment.seat"));
}

#[test]
fn validate_only_reports_first_gap() {
    let dir = tempdir().unwrap();
    let sheet = write(
        dir.path(),
        "game.yaml",
        &THREE_PLAYERS.replace("name: fedya, ", ""),
    );

    prefcount(&dir)
        .arg(&sheet)
        .arg("--validate-only")
        .assert()
        .failure()
        .stderr(predicate::str::contains("incomplete: South: name is missing"));
}

#[test]
fn validate_only_accepts_complete_sheet() {
    let dir = tempdir().unwrap();
    let sheet = write(dir.path(), "game.yaml", THREE_PLAYERS);

    prefcount(&dir)
        .arg(&sheet)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("is complete (3 players)"));
}

#[test]
fn missing_sheet_fails() {
    let dir = tempdir().unwrap();
    prefcount(&dir)
        .arg("absent.yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read game sheet"));
}

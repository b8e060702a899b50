//! Integration tests for the `bi` command-line interface.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a test encounter and return its directory and file path.
fn test_encounter() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("encounter.json");
    fs::write(
        &path,
        r#"{
  "id": "enc1",
  "round": 1,
  "turn": 2,
  "combatants": [
    { "id": "c3", "name": "Cleric", "initiative": 10, "hasPlayerOwner": true },
    { "id": "c2", "name": "Orc", "initiative": 15, "disposition": -1 },
    { "id": "c1", "name": "Fighter", "initiative": 18, "hasPlayerOwner": true, "dexterity": 14 },
    { "id": "c4", "name": "Wolf", "initiative": 2, "disposition": 1, "followTarget": "Fighter" },
    { "id": "c5", "name": "Zombie", "disposition": -1 }
  ]
}
"#,
    )
    .unwrap();
    (dir, path)
}

fn bi() -> Command {
    Command::cargo_bin("bi").unwrap()
}

// ---------------------------------------------------------------------------
// order
// ---------------------------------------------------------------------------

#[test]
fn order_shows_bracketed_tracker() {
    let (_dir, path) = test_encounter();
    bi().args(["order", "-e", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Fighter")
                .and(predicate::str::contains("here be bad guys"))
                .and(predicate::str::contains("Needs roll:"))
                .and(predicate::str::contains("Zombie")),
        );
}

#[test]
fn order_json_lists_brackets() {
    let (_dir, path) = test_encounter();
    let output = bi()
        .args(["order", "--json", "-e", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = view["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Fighter", "Orc", "Cleric", "Wolf", "Zombie"]);
    assert_eq!(view["partition"]["brackets"]["c1"], 0);
    assert_eq!(view["partition"]["brackets"]["c2"], 1);
    assert_eq!(view["partition"]["brackets"]["c3"], 2);
    assert_eq!(view["partition"]["brackets"]["c4"], 2);
    assert_eq!(view["partition"]["brackets"]["c5"], -1);
}

#[test]
fn order_fails_without_encounter() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("none.json");
    fs::write(&path, "null").unwrap();
    bi().args(["order", "-e", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no active encounter"));
}

#[test]
fn order_fails_on_missing_file() {
    bi().args(["order", "-e", "/definitely/not/here.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// follow
// ---------------------------------------------------------------------------

#[test]
fn follow_reports_updates_without_writing() {
    let (_dir, path) = test_encounter();
    bi().args(["follow", "-e", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Wolf")
                .and(predicate::str::contains("updated to 18"))
                .and(predicate::str::contains("1 initiative writes")),
        );

    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.contains(r#""initiative": 2"#));
}

#[test]
fn follow_write_saves_encounter() {
    let (_dir, path) = test_encounter();
    bi().args(["follow", "--write", "-e", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let wolf = saved["combatants"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == "c4")
        .unwrap();
    assert_eq!(wolf["initiative"], 18);
}

#[test]
fn follow_from_unknown_leader_fails() {
    let (_dir, path) = test_encounter();
    bi().args(["follow", "--leader", "Bob", "-e", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no combatant named 'Bob'"));
}

// ---------------------------------------------------------------------------
// next-round
// ---------------------------------------------------------------------------

#[test]
fn next_round_clears_rolls() {
    let (_dir, path) = test_encounter();
    bi().args(["next-round", "--write", "-e", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Round 2: cleared 5 initiative rolls"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["turn"], 0);
    assert!(
        saved["combatants"]
            .as_array()
            .unwrap()
            .iter()
            .all(|c| c["initiative"].is_null())
    );
}

// ---------------------------------------------------------------------------
// roll
// ---------------------------------------------------------------------------

#[test]
fn roll_with_manual_value() {
    bi().args(["roll", "1d20 + 5", "--manual", "-3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-3 + 5 = 2"));
}

#[test]
fn roll_collapses_plus_minus() {
    bi().args(["roll", "5 + 1d20", "-m", "-3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 - 3 = 2"));
}

#[test]
fn roll_ignores_non_numeric_manual() {
    bi().args(["roll", "1d20 + 5", "--manual", "abc", "--seed", "9"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Manual roll ignored")
                .and(predicate::str::contains("1d20 + 5 = ")),
        );
}

#[test]
fn roll_rejects_bad_formula() {
    bi().args(["roll", "1d20 * 2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid roll formula"));
}

#[test]
fn roll_rejects_out_of_range_total() {
    bi().args(["roll", "1d20 + 2147483647"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("total out of range"));
}

#[test]
fn roll_rejects_huge_dice_pool() {
    bi().args(["roll", "4294967295d20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most 100 dice"));
}

// ---------------------------------------------------------------------------
// elect
// ---------------------------------------------------------------------------

#[test]
fn elect_picks_lowest_active_gm() {
    bi().args([
        "elect",
        "-u",
        "gmB:gm",
        "-u",
        "gmA:gm:inactive",
        "-u",
        "p1:player",
        "--local",
        "gmB",
    ])
    .assert()
    .success()
    .stdout(
        predicate::str::contains("Writer: gmB")
            .and(predicate::str::contains("gmB is the writer")),
    );
}

#[test]
fn elect_without_gm() {
    bi().args(["elect", "-u", "p1:player"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No active game master"));
}

#[test]
fn elect_rejects_bad_user() {
    bi().args(["elect", "-u", "p1:wizard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad role"));
}

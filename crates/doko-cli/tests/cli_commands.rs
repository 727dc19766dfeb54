//! Integration tests for the `doko` CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Temp directory plus the snapshot path inside it.
struct Club {
    _dir: TempDir,
    data: PathBuf,
}

impl Club {
    fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("storage.json");
        Self { _dir: dir, data }
    }

    /// A club of five members, Anna through Eva.
    fn with_members() -> Self {
        let club = Self::empty();
        for name in ["Anna", "Bernd", "Carla", "Dieter", "Eva"] {
            club.doko().args(["member", "add", name]).assert().success();
        }
        club
    }

    fn doko(&self) -> Command {
        let mut cmd = Command::cargo_bin("doko").unwrap();
        cmd.env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg("--data")
            .arg(&self.data);
        cmd
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(&self.data).unwrap()).unwrap()
    }
}

// ---------------------------------------------------------------------------
// members
// ---------------------------------------------------------------------------

#[test]
fn member_add_and_list() {
    let club = Club::with_members();
    club.doko()
        .args(["member", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Anna")
                .and(predicate::str::contains("Eva"))
                .and(predicate::str::contains("5 members")),
        );
}

#[test]
fn member_list_empty() {
    let club = Club::empty();
    club.doko()
        .args(["member", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No members yet"));
}

#[test]
fn member_remove_refused_when_referenced() {
    let club = Club::with_members();
    club.doko()
        .args(["evening", "new", "-p", "Anna,Bernd,Carla,Dieter"])
        .assert()
        .success();
    club.doko()
        .args(["member", "remove", "Anna"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("referenced"));
    club.doko().args(["member", "remove", "Eva"]).assert().success();
}

// ---------------------------------------------------------------------------
// evenings
// ---------------------------------------------------------------------------

#[test]
fn evening_needs_four_or_five() {
    let club = Club::with_members();
    club.doko()
        .args(["evening", "new", "-p", "Anna,Bernd,Carla"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("4 or 5 participants"));
}

#[test]
fn evening_host_must_play() {
    let club = Club::with_members();
    club.doko()
        .args(["evening", "new", "-p", "Anna,Bernd,Carla,Dieter", "--host", "Eva"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must also be a participant"));
}

#[test]
fn five_player_evening_names_dealer() {
    let club = Club::with_members();
    club.doko()
        .args(["evening", "new", "-p", "Anna,Bernd,Carla,Dieter,Eva"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First dealer (sits out): Anna"));
}

// ---------------------------------------------------------------------------
// rounds and penalties
// ---------------------------------------------------------------------------

#[test]
fn normal_round_updates_standings() {
    let club = Club::with_members();
    club.doko()
        .args(["evening", "new", "-p", "Anna,Bernd,Carla,Dieter"])
        .assert()
        .success();
    club.doko()
        .args(["round", "-w", "Anna", "-w", "Carla", "-p", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded round 1"));

    let snapshot = club.snapshot();
    let players = &snapshot["evenings"][0]["playerData"];
    let totals: Vec<i64> = players
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["totalPoints"].as_i64().unwrap())
        .collect();
    assert_eq!(totals, vec![2, -2, 2, -2]);
}

#[test]
fn round_with_wrong_winner_count_fails() {
    let club = Club::with_members();
    club.doko()
        .args(["evening", "new", "-p", "Anna,Bernd,Carla,Dieter"])
        .assert()
        .success();
    club.doko()
        .args(["round", "--solo", "-w", "Anna", "-w", "Bernd", "-p", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid round"));
    assert_eq!(club.snapshot()["evenings"][0]["games"], serde_json::json!([]));
}

#[test]
fn round_with_zero_points_fails() {
    let club = Club::with_members();
    club.doko()
        .args(["evening", "new", "-p", "Anna,Bernd,Carla,Dieter"])
        .assert()
        .success();
    club.doko()
        .args(["round", "-w", "Anna", "-w", "Bernd", "-p", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("positive"));
}

#[test]
fn round_without_open_evening_fails() {
    let club = Club::with_members();
    club.doko()
        .args(["round", "-w", "Anna", "-w", "Bernd", "-p", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no open evening"));
}

#[test]
fn penalty_add_and_remove() {
    let club = Club::with_members();
    club.doko()
        .args(["evening", "new", "-p", "Anna,Bernd,Carla,Dieter"])
        .assert()
        .success();
    club.doko()
        .args(["penalty", "Bernd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bernd: 1 penalties"));
    club.doko()
        .args(["penalty", "Bernd", "--remove"])
        .assert()
        .success();
    club.doko()
        .args(["penalty", "Bernd", "--remove"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bernd: 0 penalties"));
}

// ---------------------------------------------------------------------------
// settlement
// ---------------------------------------------------------------------------

#[test]
fn finish_prints_settlement_once() {
    let club = Club::with_members();
    club.doko()
        .args(["evening", "new", "-p", "Anna,Bernd,Carla,Dieter", "--host", "Anna"])
        .assert()
        .success();
    club.doko()
        .args(["round", "-w", "Anna", "-w", "Bernd", "-p", "3"])
        .assert()
        .success();
    club.doko()
        .args(["finish"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Settled")
                .and(predicate::str::contains("-48.00"))
                .and(predicate::str::contains("Eva (absent)")),
        );

    let evening = club.snapshot()["evenings"][0].clone();
    assert_eq!(evening["finished"], true);
    assert_eq!(evening["settlement"]["participants"][0]["totalPayout"], -48.0);

    let id = evening["id"].as_i64().unwrap().to_string();
    club.doko()
        .args(["finish", "-e", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already finished"));
    club.doko()
        .args(["round", "-e", &id, "-w", "Carla", "-w", "Dieter", "-p", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already finished"));
}

#[test]
fn finance_after_settlement() {
    let club = Club::with_members();
    club.doko()
        .args(["evening", "new", "-p", "Anna,Bernd,Carla,Dieter"])
        .assert()
        .success();
    club.doko().args(["finish"]).assert().success();
    club.doko()
        .args(["finance"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("1 settled evenings")
                .and(predicate::str::contains("67.50")),
        );
}

#[test]
fn evening_show_and_list() {
    let club = Club::with_members();
    club.doko()
        .args(["evening", "new", "-p", "Anna,Bernd,Carla,Dieter"])
        .assert()
        .success();
    club.doko()
        .args(["round", "--solo", "-w", "Dieter", "-p", "2"])
        .assert()
        .success();
    club.doko()
        .args(["evening", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Solo").and(predicate::str::contains("+6")));
    club.doko()
        .args(["evening", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("open").and(predicate::str::contains("Pub")));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_session_saves_each_change() {
    let club = Club::with_members();
    club.doko()
        .args(["evening", "new", "-p", "Anna,Bernd,Carla,Dieter,Eva"])
        .assert()
        .success();
    club.doko()
        .arg("play")
        .write_stdin("win Bernd\nwin Carla\npoints 1\nadd\npenalty + Eva\nquit\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Round 1 recorded")
                .and(predicate::str::contains("Eva: 1 penalties"))
                .and(predicate::str::contains("Goodbye!")),
        );

    let evening = club.snapshot()["evenings"][0].clone();
    assert_eq!(evening["games"].as_array().unwrap().len(), 1);
    assert_eq!(evening["currentDealerIndex"], 1);
    assert_eq!(evening["playerData"][4]["penalties"], 1);
}

// ---------------------------------------------------------------------------
// settings
// ---------------------------------------------------------------------------

#[test]
fn settings_set_and_show() {
    let club = Club::empty();
    club.doko()
        .args(["settings", "set", "--fixed-contribution", "12.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12.50"));
    assert_eq!(club.snapshot()["settings"]["fixedContribution"], 12.5);
}

#[test]
fn settings_reject_negative() {
    let club = Club::empty();
    club.doko()
        .args(["settings", "set", "--host-bonus=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-negative"));
}

#[test]
fn legacy_snapshot_loads_with_default_contribution() {
    let club = Club::empty();
    fs::write(
        &club.data,
        r#"{"members": [], "evenings": [], "settings": {"penaltyCost": 0.5, "hostBonus": 20}}"#,
    )
    .unwrap();
    club.doko()
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed contribution:  10.00"));
}

#[test]
fn corrupt_snapshot_is_refused() {
    let club = Club::empty();
    fs::write(
        &club.data,
        r#"{"members": [], "evenings": [{"id": 3, "date": "2024-03-01T19:00:00Z",
            "participantIds": [1, 2, 3], "location": "kneipe"}]}"#,
    )
    .unwrap();
    club.doko()
        .args(["evening", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("evening 3 is corrupt"));
}

//! Integration tests for the `meetings` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise every subcommand
//! through the actual binary against a JSON calendar fixture. Working hours are
//! evaluated in UTC via `MEETINGS_TIMEZONE`.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the calendars.json fixture.
fn calendars_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/calendars.json")
}

/// Helper: the binary with a UTC default zone.
fn meetings() -> Command {
    let mut cmd = Command::cargo_bin("meetings").unwrap();
    cmd.env("MEETINGS_TIMEZONE", "UTC");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// free
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn free_lists_slots_after_buffer() {
    let slots = stdout_json(meetings().args([
        "free",
        "-e",
        calendars_path(),
        "--start",
        "2026-03-02T09:00:00Z",
        "--end",
        "2026-03-02T17:00:00Z",
        "--duration",
        "30",
    ]));

    let starts: Vec<&str> = slots
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["start"].as_str().unwrap())
        .collect();
    assert_eq!(starts, vec!["2026-03-02T10:15:00Z", "2026-03-02T15:45:00Z"]);
    assert_eq!(slots[0]["duration_minutes"], 30);
}

#[test]
fn free_across_calendars_sees_all_day_event() {
    meetings()
        .args([
            "free",
            "-e",
            calendars_path(),
            "-c",
            "primary",
            "-c",
            "work",
            "--start",
            "2026-03-03T09:00",
            "--end",
            "2026-03-03T17:00",
            "--duration",
            "30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn free_honors_config_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[working_hours]\nbuffer_minutes = 0").unwrap();

    meetings()
        .args(["--config", file.path().to_str().unwrap()])
        .args([
            "free",
            "-e",
            calendars_path(),
            "--start",
            "2026-03-02T09:00:00Z",
            "--end",
            "2026-03-02T17:00:00Z",
            "--duration",
            "30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-03-02T10:00:00Z"))
        .stdout(predicate::str::contains("10:15").not());
}

#[test]
fn free_rejects_zero_duration() {
    meetings()
        .args([
            "free",
            "-e",
            calendars_path(),
            "--start",
            "2026-03-02T09:00:00Z",
            "--end",
            "2026-03-02T17:00:00Z",
            "--duration",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duration must be positive"));
}

#[test]
fn missing_events_file_fails() {
    meetings()
        .args([
            "free",
            "-e",
            "/nonexistent/calendars.json",
            "--start",
            "2026-03-02T09:00:00Z",
            "--end",
            "2026-03-02T17:00:00Z",
            "--duration",
            "30",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read events file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// conflicts / suggest
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn conflicts_reports_overlap_bounds() {
    let conflicts = stdout_json(meetings().args([
        "conflicts",
        "-e",
        calendars_path(),
        "--start",
        "2026-03-02T14:00:00Z",
        "--end",
        "2026-03-02T15:00:00Z",
    ]));

    let conflicts = conflicts.as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["calendar_id"], "primary");
    assert_eq!(conflicts[0]["conflicting_event"]["id"], "review");
    assert_eq!(conflicts[0]["overlap_start"], "2026-03-02T14:30:00Z");
    assert_eq!(conflicts[0]["overlap_end"], "2026-03-02T15:00:00Z");
}

#[test]
fn conflicts_ignores_touching_and_cancelled_events() {
    meetings()
        .args([
            "conflicts",
            "-e",
            calendars_path(),
            "--start",
            "2026-03-02T10:00:00Z",
            "--end",
            "2026-03-02T12:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn suggest_returns_alternatives_for_a_conflict() {
    let result = stdout_json(meetings().args([
        "suggest",
        "-e",
        calendars_path(),
        "--start",
        "2026-03-02T14:00:00Z",
        "--end",
        "2026-03-02T15:00:00Z",
        "--title",
        "Design review",
    ]));

    assert_eq!(result["conflicts"].as_array().unwrap().len(), 1);
    let alternatives = result["alternatives"].as_array().unwrap();
    assert_eq!(alternatives.len(), 2);
    assert_eq!(alternatives[0]["title"], "Design review");
    assert_eq!(alternatives[0]["start"], "2026-03-02T10:15:00Z");
    assert_eq!(alternatives[0]["end"], "2026-03-02T11:15:00Z");
    assert_eq!(alternatives[1]["start"], "2026-03-02T15:45:00Z");
}

#[test]
fn suggest_avoids_every_checked_calendar() {
    // Tuesday clashes with the all-day offsite on "work"; primary alone is empty.
    let result = stdout_json(meetings().args([
        "suggest",
        "-e",
        calendars_path(),
        "-c",
        "primary",
        "-c",
        "work",
        "--start",
        "2026-03-03T10:00:00Z",
        "--end",
        "2026-03-03T10:30:00Z",
    ]));

    let conflicts = result["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["calendar_id"], "work");
    for alt in result["alternatives"].as_array().unwrap() {
        let start = alt["start"].as_str().unwrap();
        assert!(!start.starts_with("2026-03-03"), "{start} is during the offsite");
    }
}

#[test]
fn free_rejects_out_of_range_duration() {
    meetings()
        .args([
            "free",
            "-e",
            calendars_path(),
            "--start",
            "2026-03-02T09:00:00Z",
            "--end",
            "2026-03-02T17:00:00Z",
            "--duration",
            "200000000000000",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duration"));
}

#[test]
fn suggest_without_conflict_has_no_alternatives() {
    let result = stdout_json(meetings().args([
        "suggest",
        "-e",
        calendars_path(),
        "--start",
        "2026-03-02T12:00:00Z",
        "--end",
        "2026-03-02T13:00:00Z",
    ]));

    assert!(result["conflicts"].as_array().unwrap().is_empty());
    assert!(result["alternatives"].as_array().unwrap().is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// optimal / rrule
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn optimal_lists_shared_hours() {
    let times = stdout_json(meetings().args([
        "optimal",
        "--tz",
        "America/New_York",
        "--tz",
        "Europe/London",
        "--date",
        "2026-03-02",
    ]));

    let hours: Vec<u64> = times
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["utc_hour"].as_u64().unwrap())
        .collect();
    assert_eq!(hours, vec![14, 15, 16]);
}

#[test]
fn optimal_rejects_unknown_zone() {
    meetings()
        .args(["optimal", "--tz", "Atlantis/Capital", "--date", "2026-03-02"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn rrule_prints_composed_rule() {
    meetings()
        .args([
            "rrule",
            "--freq",
            "weekly",
            "--count",
            "4",
            "--start",
            "2026-03-02T09:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("RRULE:FREQ=WEEKLY;COUNT=4\n"));
}

#[test]
fn rrule_with_until_renders_utc() {
    meetings()
        .args([
            "rrule",
            "--freq",
            "daily",
            "--until",
            "2026-03-31T17:00",
            "--start",
            "2026-03-02T09:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("UNTIL=20260331T170000Z"));
}

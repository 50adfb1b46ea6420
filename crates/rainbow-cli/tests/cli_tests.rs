//! Integration tests for the `rainbow` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to drive the filter,
//! generate, and conflicts subcommands against a fixture catalog, including
//! stdin listings, file output, environment defaults, and error exits.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Helper: root of the fixture catalog (holds MAN/202510.json).
fn catalog_dir() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/catalog")
}

/// Helper: the single term listing inside the fixture catalog.
fn listing_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/catalog/MAN/202510.json")
}

/// Helper: the binary with no `RAINBOW_*` settings leaking in from the host.
fn rainbow() -> Command {
    let mut cmd = Command::cargo_bin("rainbow").unwrap();
    for var in [
        "RAINBOW_CATALOG",
        "RAINBOW_MAX_SCHEDULES",
        "RAINBOW_MAX_NODES",
        "RAINBOW_CONFIG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Helper: run against the fixture catalog and parse stdout as JSON.
fn run_json(args: &[&str]) -> Value {
    let output = rainbow()
        .args(args)
        .args(["--catalog", catalog_dir(), "--inst", "MAN", "--term", "202510"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

fn crn_sets(body: &Value) -> Vec<Vec<String>> {
    body["schedules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| {
            s["sections"]
                .as_array()
                .unwrap()
                .iter()
                .map(|sec| sec["crn"].as_str().unwrap().to_string())
                .collect()
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Generate subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn generate_lists_every_conflict_free_schedule() {
    let body = run_json(&["generate", "--cid", "ICS 111", "--cid", "MATH 241"]);

    assert_eq!(body["status"], "ok");
    assert_eq!(body["count"], 5);
    assert_eq!(body["truncated"], false);
    assert_eq!(
        crn_sets(&body),
        vec![
            vec!["10001", "20002"],
            vec!["10002", "20001"],
            vec!["10002", "20002"],
            vec!["10003", "20001"],
            vec!["10003", "20002"],
        ]
    );
}

#[test]
fn generate_accepts_comma_separated_course_ids() {
    let body = run_json(&["generate", "--cid", "ics111,math241"]);
    assert_eq!(body["count"], 5);
}

#[test]
fn generate_respects_max_schedules() {
    let body = run_json(&[
        "generate",
        "--cid",
        "ICS 111",
        "--cid",
        "MATH 241",
        "--max-schedules",
        "2",
    ]);

    assert_eq!(body["count"], 2);
    assert_eq!(body["truncated"], true);
}

#[test]
fn generate_reports_partial_miss() {
    // Every MATH 241 section meets on Friday.
    let body = run_json(&["generate", "--cid", "ICS 111", "--cid", "MATH 241", "--day", "!F"]);

    assert_eq!(body["status"], "incomplete");
    assert_eq!(body["missing"]["course_ids"], serde_json::json!(["MATH 241"]));
    assert!(body.get("schedules").is_none());
}

#[test]
fn generate_reports_complete_miss() {
    let body = run_json(&["generate", "--cid", "CHEM 161", "--crn", "99999"]);

    assert_eq!(body["status"], "nothing_found");
    assert_eq!(body["missing"]["crns"], serde_json::json!(["99999"]));
    assert_eq!(body["missing"]["course_ids"], serde_json::json!(["CHEM 161"]));
}

#[test]
fn generate_pins_requested_crn() {
    let body = run_json(&["generate", "--crn", "20002", "--cid", "ICS 111"]);

    let sets = crn_sets(&body);
    assert_eq!(sets.len(), 3);
    assert!(sets.iter().all(|s| s[0] == "20002"));
}

#[test]
fn generate_reads_catalog_and_limits_from_environment() {
    let output = rainbow()
        .env("RAINBOW_CATALOG", catalog_dir())
        .env("RAINBOW_MAX_SCHEDULES", "1")
        .args(["generate", "--inst", "MAN", "--term", "202510", "--cid", "ICS 111"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["truncated"], true);
}

#[test]
fn generate_flag_overrides_environment_limit() {
    let output = rainbow()
        .env("RAINBOW_MAX_SCHEDULES", "1")
        .args([
            "generate",
            "--catalog",
            catalog_dir(),
            "--inst",
            "MAN",
            "--term",
            "202510",
            "--cid",
            "ICS 111",
            "--max-schedules",
            "10",
        ])
        .output()
        .unwrap();

    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["count"], 3);
    assert_eq!(body["truncated"], false);
}

#[test]
fn generate_writes_output_file() {
    let output_path = "/tmp/rainbow-test-generate-output.json";
    let _ = std::fs::remove_file(output_path);

    rainbow()
        .args([
            "generate",
            "--catalog",
            catalog_dir(),
            "--inst",
            "MAN",
            "--term",
            "202510",
            "--cid",
            "ENG 100",
            "-o",
            output_path,
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    let body: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(body["count"], 1);

    let _ = std::fs::remove_file(output_path);
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn filter_prints_matching_sections() {
    let body = run_json(&["filter", "--cid", "ICS 111", "--online", "true"]);

    let sections = body["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["crn"], "10003");
    assert_eq!(sections[0]["is_synchronous"], false);
    assert!(body["missing"]["crns"].as_array().unwrap().is_empty());
}

#[test]
fn filter_time_window() {
    let body = run_json(&["filter", "--start-after", "09:00", "--end-before", "11:30"]);

    // 20001 has an afternoon meeting; 30001 runs until 15:00.
    let crns: Vec<&str> = body["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["crn"].as_str().unwrap())
        .collect();
    assert_eq!(crns, ["10001", "10002", "10003", "20002"]);
}

#[test]
fn filter_reports_missing_items() {
    let body = run_json(&["filter", "--crn", "10001,88888"]);

    assert_eq!(body["sections"].as_array().unwrap().len(), 1);
    assert_eq!(body["missing"]["crns"], serde_json::json!(["88888"]));
}

// ─────────────────────────────────────────────────────────────────────────────
// Conflicts subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn conflicts_reports_each_shared_day() {
    let body = run_json(&["conflicts", "--crn", "10001,20001,30001"]);

    assert_eq!(body["count"], 2);
    let days: Vec<&str> = body["conflicts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["day"].as_str().unwrap())
        .collect();
    assert_eq!(days, ["M", "W"]);
    assert_eq!(body["conflicts"][0]["crn_a"], "10001");
    assert_eq!(body["conflicts"][0]["crn_b"], "20001");
    assert_eq!(body["conflicts"][0]["overlap_minutes"], 45);
}

#[test]
fn conflicts_from_stdin_listing() {
    let listing = std::fs::read_to_string(listing_path()).unwrap();

    rainbow()
        .args(["conflicts", "-i", "-", "--crn", "10002,20002"])
        .write_stdin(listing)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 0"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Error handling
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn invalid_time_window_fails() {
    rainbow()
        .args([
            "generate",
            "--catalog",
            catalog_dir(),
            "--inst",
            "MAN",
            "--term",
            "202510",
            "--start-after",
            "14:00",
            "--end-before",
            "09:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("end_before"));
}

#[test]
fn invalid_boolean_fails() {
    rainbow()
        .args(["filter", "-i", listing_path(), "--online", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("online"));
}

#[test]
fn unknown_term_fails() {
    rainbow()
        .args([
            "generate",
            "--catalog",
            catalog_dir(),
            "--inst",
            "MAN",
            "--term",
            "199910",
            "--cid",
            "ICS 111",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Catalog access error"));
}

#[test]
fn malformed_listing_fails() {
    rainbow()
        .args(["filter", "-i", "-"])
        .write_stdin(r#"{"sections": [{"crn": "1"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse listing"));
}

#[test]
fn missing_catalog_fails() {
    rainbow()
        .args(["generate", "--inst", "MAN", "--term", "202510"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No catalog given"));
}

#[test]
fn catalog_without_term_fails() {
    rainbow()
        .args(["generate", "--catalog", catalog_dir(), "--inst", "MAN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--term"));
}

#[test]
fn help_flag_shows_usage() {
    rainbow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("filter"))
        .stdout(predicate::str::contains("conflicts"));
}

#[test]
fn unknown_subcommand_fails() {
    rainbow().arg("bogus").assert().failure();
}

//! Integration tests for the vr-cli binary commands.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vr() -> Command {
    let mut cmd = Command::cargo_bin("vr").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

// -- roll --

#[test]
fn roll_is_replayable() {
    let first = vr()
        .args(["roll", "2d8+3", "--seed", "abc"])
        .output()
        .unwrap();
    let second = vr()
        .args(["roll", "2d8+3", "--seed", "abc"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    let text = String::from_utf8(first.stdout).unwrap();
    assert!(text.contains("2d8+3"));
    assert!(text.contains("range 5-19"));
}

#[test]
fn roll_rejects_bad_notation() {
    vr().args(["roll", "2x8", "--seed", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: invalid dice notation"));
}

#[test]
fn roll_rejects_oversized_die_and_doubled_sign() {
    vr().args(["roll", "100d100000000", "--seed", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most 1000 sides"));
    vr().args(["roll", "2d8--3", "--seed", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("modifier is not a number"));
}

#[test]
fn roll_without_seed_prints_generated_seed() {
    vr().args(["roll", "1d20"])
        .assert()
        .success()
        .stderr(predicate::str::contains("seed:"));
}

// -- resolve --

#[test]
fn resolve_json_matches_golden_roll() {
    let outcome = json_stdout(vr().args(["resolve", "mining", "--seed", "voidreach", "--json"]));
    assert_eq!(outcome["natural_roll"], 12);
    assert_eq!(outcome["action"], "mining");
    assert_eq!(outcome["seed"], "voidreach");
    assert!(outcome["secondary_rolls"]["hazard"].is_object());
}

#[test]
fn resolve_is_replayable() {
    let a = vr()
        .args(["resolve", "derelict", "--seed", "replay", "--json"])
        .output()
        .unwrap();
    let b = vr()
        .args(["resolve", "derelict", "--seed", "replay", "--json"])
        .output()
        .unwrap();
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn resolve_prints_presentation() {
    vr().args(["resolve", "away-team", "--seed", "landing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Away Team:"))
        .stdout(predicate::str::contains("Check"))
        .stdout(predicate::str::contains("seed landing"));
}

#[test]
fn resolve_unknown_action_fails() {
    vr().args(["resolve", "warp", "--seed", "s"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: unknown action type: warp"));
}

#[test]
fn resolve_combat_uses_context_defense() {
    let dir = TempDir::new().unwrap();
    let ctx = write(
        &dir,
        "combat.json",
        r#"{ "combat": { "target": "raider", "defense": 17, "armor": 1, "weapon_damage": "2d6" } }"#,
    );
    let outcome = json_stdout(vr().args([
        "resolve",
        "combat",
        "--seed",
        "volley",
        "--json",
        "--context",
        ctx.to_str().unwrap(),
    ]));
    assert_eq!(outcome["target_difficulty"], 17);
    assert_eq!(outcome["target_source"], "defense");
}

#[test]
fn resolve_rejects_malformed_context() {
    let dir = TempDir::new().unwrap();
    let ctx = write(&dir, "bad.json", "{ not json");
    vr().args(["resolve", "mining", "--seed", "s", "--context"])
        .arg(&ctx)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: invalid JSON"));
}

#[test]
fn resolve_appends_telemetry() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("telemetry.jsonl");
    for seed in ["one", "two"] {
        vr().args(["resolve", "scavenging", "--seed", seed, "--telemetry"])
            .arg(&log)
            .assert()
            .success();
    }
    let content = fs::read_to_string(&log).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let snap: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(snap["action"], "scavenging");
    }
}

// -- odds, hit, balance --

#[test]
fn odds_follow_configured_targets() {
    let dir = TempDir::new().unwrap();
    let config = write(
        &dir,
        "engine.json",
        r#"{ "difficulty_overrides": { "normal": 15 } }"#,
    );
    let report = json_stdout(vr().args([
        "odds",
        "derelict",
        "--json",
        "--config",
        config.to_str().unwrap(),
    ]));
    assert_eq!(report["target_difficulty"], 15);
    let modifier = report["modifier_total"].as_i64().unwrap();
    let passing = (20 - (15 - modifier)).clamp(0, 18);
    let expected = 5.0 * (1 + passing) as f64;
    assert_eq!(report["success_chance"].as_f64().unwrap(), expected);
}

#[test]
fn odds_table_lists_every_tier() {
    vr().args(["odds", "mining"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Critical Success"))
        .stdout(predicate::str::contains("Partial Success"))
        .stdout(predicate::str::contains("Critical Failure"));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "engine.json", r#"{ "partial_band": 40 }"#);
    vr().args(["odds", "mining", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("partial_band"));
}

#[test]
fn hit_preview_reports_chance_and_damage() {
    let dir = TempDir::new().unwrap();
    let ctx = write(
        &dir,
        "combat.json",
        r#"{ "combat": { "target": "corsair", "defense": 14, "armor": 2 } }"#,
    );
    vr().args(["hit", "--context"])
        .arg(&ctx)
        .assert()
        .success()
        .stdout(predicate::str::contains("Attack on corsair"))
        .stdout(predicate::str::contains("Hit chance"))
        .stdout(predicate::str::contains("Expected damage"));
}

#[test]
fn balance_names_a_difficulty() {
    vr().args(["balance", "derelict", "--chance", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Closest to 50% for Derelict: Normal"))
        .stdout(predicate::str::contains("Very Hard"));
}

#[test]
fn balance_rejects_out_of_range_chance() {
    vr().args(["balance", "derelict", "--chance", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 100"));
}

// -- simulate --

#[test]
fn simulate_compares_with_preview() {
    vr().args(["simulate", "mining", "-n", "500", "--seed", "sim"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Observed"))
        .stdout(predicate::str::contains("Preview"))
        .stdout(predicate::str::contains("Largest deviation"));
}

#[test]
fn simulate_rejects_zero_iterations() {
    vr().args(["simulate", "mining", "-n", "0", "--seed", "sim"])
        .assert()
        .failure();
}

// -- tables --

#[test]
fn tables_lists_builtin_data() {
    vr().arg("tables")
        .assert()
        .success()
        .stdout(predicate::str::contains("mining.hazards"))
        .stdout(predicate::str::contains("mission.bonus"))
        .stdout(predicate::str::contains("combat_status"));
}

#[test]
fn tables_rejects_invalid_file() {
    let dir = TempDir::new().unwrap();
    let file = write(
        &dir,
        "tables.json",
        r#"{ "tables": { "mining.hazards": [ { "weight": -1, "label": "bad" } ] }, "combat_status": [] }"#,
    );
    vr().args(["tables", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid table 'mining.hazards'"));
}

#[test]
fn global_tables_flag_is_validated() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "tables.json", r#"{ "tables": {}, "combat_status": [] }"#);
    vr().args(["resolve", "mining", "--seed", "s", "--tables"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("required table is missing"));
}

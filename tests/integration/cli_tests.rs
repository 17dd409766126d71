//! CLI surface tests via assert_cmd.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn outpost() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("outpost"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Write a complete config.json into `<home>/.outpost/`.
fn write_config(home: &TempDir) {
    let dir = home.path().join(".outpost");
    std::fs::create_dir_all(&dir).expect("create .outpost dir");
    let ssh_config = home.path().join("ssh_config");
    let json = format!(
        r#"{{"image_id":"img-1","security_group_id":"sg-1","ssh_user":"ubuntu","instance_type":"small","ssh_config_path":"{}"}}"#,
        ssh_config.display()
    );
    std::fs::write(dir.join("config.json"), json).expect("write config.json");
}

/// Write a project record into `<home>/.outpost/projects/`.
fn write_record(home: &TempDir, name: &str) {
    let dir = home.path().join(".outpost").join("projects");
    std::fs::create_dir_all(&dir).expect("create projects dir");
    let json = format!(
        r#"{{"name":"{name}","instance_id":"i-0abc123","ssh_user":"ubuntu","created_at":"2026-03-02T10:00:00Z"}}"#
    );
    std::fs::write(dir.join(format!("{name}.json")), json).expect("write record");
}

// --- Help and version ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    outpost()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("On-demand cloud dev machines"));
}

#[test]
fn test_cli_help_flag_shows_help() {
    outpost()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    outpost()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("outpost"));
}

#[test]
fn test_help_lists_all_commands() {
    let mut assert = outpost().arg("--help").assert().success();
    for command in ["init", "start", "delete", "config"] {
        assert = assert.stdout(predicate::str::contains(command));
    }
}

// --- init ---

#[test]
fn test_init_without_config_fails_with_hint() {
    let home = TempDir::new().expect("tempdir");
    outpost()
        .args(["init", "demo"])
        .env("HOME", home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration incomplete"))
        .stderr(predicate::str::contains("outpost config"));
}

#[test]
fn test_init_existing_project_fails_before_any_provisioning() {
    let home = TempDir::new().expect("tempdir");
    write_config(&home);
    write_record(&home, "demo");
    outpost()
        .args(["init", "demo"])
        .env("HOME", home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_invalid_project_name_fails() {
    let home = TempDir::new().expect("tempdir");
    write_config(&home);
    outpost()
        .args(["init", "Bad/Name"])
        .env("HOME", home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid project name"));
}

// --- start ---

#[test]
fn test_start_unknown_project_fails_with_init_hint() {
    let home = TempDir::new().expect("tempdir");
    outpost()
        .args(["start", "ghost"])
        .env("HOME", home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("outpost init"));
}

// --- delete ---

#[test]
fn test_delete_unknown_project_fails() {
    let home = TempDir::new().expect("tempdir");
    outpost()
        .args(["delete", "ghost"])
        .env("HOME", home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// --- argument validation ---

#[test]
fn test_init_requires_project_argument() {
    outpost().arg("init").assert().failure();
}

#[test]
fn test_unknown_subcommand_fails() {
    outpost().arg("teleport").assert().failure();
}

//! CLI integration tests for bucketview
//!
//! These tests drive the binary end to end against a store file in a
//! temporary directory.

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary store plus an empty config file so user settings never leak in
struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "").unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn db(&self) -> PathBuf {
        self.dir.path().join("test.db")
    }

    /// Command with `--config` and `--db` already set
    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = bare_cmd();
        cmd.arg("--config")
            .arg(self.path().join("config.toml"))
            .arg("--db")
            .arg(self.db());
        cmd
    }

    fn run(&self, args: &[&str]) {
        self.cmd().args(args).assert().success();
    }
}

/// Get a command instance for the bucketview binary
fn bare_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("bucketview"));
    cmd.env_remove("BUCKETVIEW_DB")
        .env_remove("BUCKETVIEW_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

/// Store with bucket `users` holding `alice = A`
fn setup_users() -> Env {
    let env = Env::new();
    env.run(&["create", "users"]);
    env.run(&["set", "users.alice", "A"]);
    env
}

// =============================================================================
// Help and Resolution
// =============================================================================

#[test]
fn test_help_lists_commands() {
    let env = Env::new();

    env.cmd()
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("del"))
        .stdout(predicate::str::contains("ls"));

    // help never touches the store
    assert!(!env.db().exists());
}

#[test]
fn test_no_command_shows_help() {
    let env = Env::new();

    env.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("usage: bucketview"));
}

#[test]
fn test_unknown_command_fails() {
    let env = Env::new();

    env.cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown command: frobnicate"));
}

// =============================================================================
// Get
// =============================================================================

#[test]
fn test_get_prints_value() {
    let env = setup_users();

    env.cmd()
        .args(["get", "users.alice"])
        .assert()
        .success()
        .stdout("A\n");
}

#[test]
fn test_get_export_writes_file() {
    let env = setup_users();
    let out = env.path().join("out");

    env.cmd()
        .args(["get", "users.alice", "-e"])
        .arg(&out)
        .assert()
        .success()
        .stdout("ok\n");

    assert_eq!(fs::read(&out).unwrap(), b"A");
}

#[test]
fn test_get_hex_format() {
    let env = setup_users();

    env.cmd()
        .args(["get", "users.alice", "-f", "hex"])
        .assert()
        .success()
        .stdout("41\n");
}

#[test]
fn test_get_missing_key_is_empty() {
    let env = setup_users();

    env.cmd()
        .args(["get", "users.nobody"])
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn test_get_missing_bucket_fails() {
    let env = setup_users();

    env.cmd()
        .args(["get", "nosuch.key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bucket does not exist: nosuch"));
}

#[test]
fn test_get_invalid_params() {
    let env = setup_users();

    for args in [
        vec!["get"],
        vec!["get", "users"],
        vec!["get", "users.alice", "-e"],
        vec!["get", "users.alice", "-z", "x"],
    ] {
        env.cmd()
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid params"));
    }
}

#[test]
fn test_get_json_output() {
    let env = setup_users();

    let output = env
        .cmd()
        .args(["--format", "json", "get", "users.alice"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["bucket"], "users");
    assert_eq!(json["key"], "alice");
    assert_eq!(json["value"], "A");
}

// =============================================================================
// Buckets and Keys
// =============================================================================

#[test]
fn test_create_and_list_buckets() {
    let env = Env::new();
    env.run(&["create", "users", "orders"]);

    env.cmd()
        .arg("ls")
        .assert()
        .success()
        .stdout("orders\nusers\n");
}

#[test]
fn test_create_duplicate_bucket_fails() {
    let env = setup_users();

    env.cmd()
        .args(["create", "users"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bucket already exists: users"));
}

#[test]
fn test_set_without_bucket_fails() {
    let env = Env::new();

    env.cmd()
        .args(["set", "users.alice", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bucket does not exist"));
}

#[test]
fn test_keys_sorted() {
    let env = setup_users();
    env.run(&["set", "users.carol", "C"]);
    env.run(&["set", "users.bob", "B"]);

    env.cmd()
        .args(["keys", "users"])
        .assert()
        .success()
        .stdout("alice\nbob\ncarol\n");
}

#[test]
fn test_ls_json() {
    let env = setup_users();

    let output = env
        .cmd()
        .args(["--format", "json", "ls"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json, serde_json::json!(["users"]));
}

#[test]
fn test_stat() {
    let env = setup_users();

    env.cmd()
        .arg("stat")
        .assert()
        .success()
        .stdout(predicate::str::contains("users\t1\t1"));
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn test_del_key_then_bucket() {
    let env = setup_users();

    env.cmd()
        .args(["del", "users.alice", "users"])
        .assert()
        .success();

    env.cmd()
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("users").not());
}

#[test]
fn test_del_ignores_key_failure() {
    let env = setup_users();
    env.run(&["create", "scratch"]);

    env.cmd()
        .args(["del", "nosuch.key", "scratch"])
        .assert()
        .success();

    env.cmd().arg("ls").assert().success().stdout("users\n");
}

#[test]
fn test_del_missing_bucket_fails() {
    let env = setup_users();

    env.cmd()
        .args(["del", "nosuch", "users"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bucket does not exist: nosuch"));

    // Processing stopped before `users`
    env.cmd().arg("ls").assert().success().stdout("users\n");
}

// =============================================================================
// Store Location and Configuration
// =============================================================================

#[test]
fn test_unopenable_store_is_fatal() {
    let env = Env::new();

    bare_cmd()
        .arg("--config")
        .arg(env.path().join("config.toml"))
        .arg("--db")
        .arg(env.path())
        .arg("ls")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot open store"));
}

#[test]
fn test_db_from_environment() {
    let env = Env::new();
    let db = env.path().join("from-env.db");

    bare_cmd()
        .arg("--config")
        .arg(env.path().join("config.toml"))
        .env("BUCKETVIEW_DB", &db)
        .args(["create", "users"])
        .assert()
        .success();

    assert!(db.exists());
}

#[test]
fn test_db_from_config_file() {
    let env = Env::new();
    let db = env.path().join("from-config.db");
    let config = env.path().join("custom.toml");
    fs::write(&config, format!("db = {:?}\nformat = \"json\"\n", db.display().to_string())).unwrap();

    bare_cmd()
        .arg("--config")
        .arg(&config)
        .args(["create", "users"])
        .assert()
        .success();

    bare_cmd()
        .arg("--config")
        .arg(&config)
        .arg("ls")
        .assert()
        .success()
        .stdout("[\"users\"]\n");
}

#[test]
fn test_missing_config_file_fails() {
    let env = Env::new();

    bare_cmd()
        .arg("--config")
        .arg(env.path().join("absent.toml"))
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

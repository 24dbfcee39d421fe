//! End-to-end tests for the `ws` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Session {
    temp: TempDir,
    config: PathBuf,
}

impl Session {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let config = temp.path().join("wishstore.yml");
        let slot_dir = temp.path().join("slots");
        fs::write(
            &config,
            format!("slot-dir: {}\nslot-key: test.wishlist\ncurrency: \"Rs \"\n", slot_dir.display()),
        )
        .expect("Failed to write config");
        Self { temp, config }
    }

    fn ws(&self) -> Command {
        let mut cmd = Command::cargo_bin("ws").expect("binary built");
        cmd.current_dir(self.temp.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("WISHSTORE_SLOT_DIR")
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    fn add(&self, id: &str, name: &str) {
        self.ws()
            .args(["add", "--id", id, "--name", name, "--price", "1200", "--original-price", "1600"])
            .assert()
            .success();
    }
}

#[test]
fn test_add_and_list() {
    let session = Session::new();
    session.add("1", "Ikat Saree");

    session
        .ws()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ikat Saree"))
        .stdout(predicate::str::contains("Rs 1200.00"))
        .stdout(predicate::str::contains("-25%"));
}

#[test]
fn test_duplicate_add_reports_already_saved() {
    let session = Session::new();
    session.add("1", "Ikat Saree");

    session
        .ws()
        .args(["add", "--id", "1", "--name", "Other", "--price", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already saved"));

    session
        .ws()
        .arg("count")
        .assert()
        .success()
        .stdout(predicate::str::diff("1\n"));
}

#[test]
fn test_contains_and_remove() {
    let session = Session::new();
    session.add("7", "Kantha Quilt");

    session.ws().args(["contains", "7"]).assert().success().stdout("yes\n");
    session.ws().args(["remove", "7"]).assert().success();
    session.ws().args(["contains", "7"]).assert().success().stdout("no\n");
    session
        .ws()
        .args(["remove", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not saved"));
}

#[test]
fn test_clear_writes_empty_slot() {
    let session = Session::new();
    session.add("1", "Ikat Saree");
    session.add("2", "Chanderi Dupatta");

    session.ws().arg("clear").assert().success();
    session.ws().arg("count").assert().success().stdout("0\n");

    let raw = fs::read_to_string(session.temp.path().join("slots").join("test.wishlist.json")).unwrap();
    assert_eq!(raw, "[]");
}

#[test]
fn test_list_json() {
    let session = Session::new();
    session.add("3", "Pashmina Shawl");

    let output = session.ws().args(["list", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let items: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(items[0]["id"], 3);
    assert_eq!(items[0]["originalPrice"], 1600.0);
}

#[test]
fn test_corrupt_slot_is_not_fatal() {
    let session = Session::new();
    let slots = session.temp.path().join("slots");
    fs::create_dir_all(&slots).unwrap();
    fs::write(slots.join("test.wishlist.json"), "not valid json").unwrap();

    session.ws().arg("count").assert().success().stdout("0\n");
}

#[test]
fn test_size_line_only_after_real_change() {
    let session = Session::new();

    session
        .ws()
        .args(["add", "--id", "1", "--name", "Ikat Saree", "--price", "1200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wishlist now has 1 item(s)"));

    session
        .ws()
        .args(["add", "--id", "1", "--name", "Ikat Saree", "--price", "1200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wishlist now has").not());

    session
        .ws()
        .args(["remove", "99"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wishlist now has").not());

    session
        .ws()
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wishlist now has 0 item(s)"));
}

#[test]
fn test_rust_log_controls_logging() {
    let session = Session::new();

    session
        .ws()
        .arg("count")
        .assert()
        .success()
        .stderr(predicate::str::contains("Opened collection").not());

    session
        .ws()
        .env("RUST_LOG", "debug")
        .arg("count")
        .assert()
        .success()
        .stdout("0\n")
        .stderr(predicate::str::contains("Opened collection"));

    session
        .ws()
        .arg("--verbose")
        .arg("count")
        .assert()
        .success()
        .stderr(predicate::str::contains("Opened collection"));
}

#[test]
fn test_missing_config_file_fails() {
    let session = Session::new();
    let mut cmd = Command::cargo_bin("ws").unwrap();
    cmd.current_dir(session.temp.path())
        .args(["--config", "does-not-exist.yml", "count"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

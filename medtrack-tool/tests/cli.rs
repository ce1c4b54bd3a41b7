use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

/// `medt` with an isolated home directory and the local store.
fn cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("medt").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("MEDTRACK_FIREBASE_API_KEY")
        .env_remove("MEDTRACK_FIREBASE_PROJECT")
        .arg("--store-type")
        .arg("local")
        .arg("--store")
        .arg(home.path().join("store"));
    cmd
}

#[test]
fn decode_prints_fields() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["decode", "(01)12345678901234(17)260115"])
        .assert()
        .success()
        .stdout(contains("GTIN: 12345678901234"))
        .stdout(contains("Expiry: 2026-01-15"));
}

#[test]
fn decode_json() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--json", "decode", "(17)260115"])
        .assert()
        .success()
        .stdout(contains(r#""expiryDate": "2026-01-15""#))
        .stdout(contains(r#""productCode": null"#))
        .stdout(contains("expiry_date").not());
}

#[test]
fn scan_then_list() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["scan", "(01)12345678901234(17)260115"])
        .assert()
        .success()
        .stdout(contains("Medicine saved!"));

    cmd(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("12345678901234  Expiry: 2026-01-15"));
}

#[test]
fn partial_scan_fails() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["scan", "(01)12345678901234"])
        .assert()
        .failure()
        .stderr(contains("Could not extract GTIN or Expiry Date from barcode."));

    cmd(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No medicines found."));
}

#[test]
fn add_rejects_malformed_date() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["add", "--name", "Aspirin", "--expiry", "2026-1-5"])
        .assert()
        .failure()
        .stderr(contains("Invalid expiry date"));
}

#[test]
fn reminders_skip_far_expiries() {
    let home = TempDir::new().unwrap();
    for (name, expiry) in [
        ("Aspirin", "2025-11-30"),
        ("Ibuprofen", "2025-12-20"),
        ("Vitamin D", "2026-06-01"),
    ] {
        cmd(&home)
            .args(["add", "--name", name, "--expiry", expiry])
            .assert()
            .success();
    }

    cmd(&home)
        .args(["reminders", "--today", "2025-12-01"])
        .assert()
        .success()
        .stdout(contains("[expired] Aspirin"))
        .stdout(contains("[warning] Ibuprofen  Expiry: 2025-12-20 (19 days left)"))
        .stdout(contains("Vitamin D").not());
}

#[test]
fn whoami_without_session() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("Not logged in."));
}

#[test]
fn firestore_needs_configuration() {
    let home = TempDir::new().unwrap();
    Command::cargo_bin("medt")
        .unwrap()
        .env("HOME", home.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("MEDTRACK_FIREBASE_API_KEY")
        .env_remove("MEDTRACK_FIREBASE_PROJECT")
        .args(["--store-type", "firestore", "list"])
        .assert()
        .failure()
        .stderr(contains("Firebase is not configured"));
}

#[test]
fn store_commands_on_empty_store() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No medicines found."));

    cmd(&home)
        .args(["reminders", "--today", "2025-12-01"])
        .assert()
        .success()
        .stdout(contains("No medicines expiring soon."));

    cmd(&home)
        .args(["--json", "list"])
        .assert()
        .success()
        .stdout(contains(r#""ok": true"#));
}

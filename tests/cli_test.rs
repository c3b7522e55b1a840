//! Integration tests for the two binaries.
//!
//! The binaries resolve `transmission-remote` and `mail` through `PATH`, so
//! the tests prepend a temporary directory holding fake executables and run
//! the real binaries via `CARGO_BIN_EXE_*`.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const WATCH_BIN: &str = env!("CARGO_BIN_EXE_transmission-watch");
const PAUSE_BIN: &str = env!("CARGO_BIN_EXE_transmission-pause");

fn write_script(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
}

/// Installs a fake `transmission-remote` answering the listing mode with one
/// finished torrent and the stop mode with a success confirmation.
fn install_fake_remote(dir: &Path) {
    let script = format!(
        r#"#!/bin/sh
echo "$@" >> "{args}"
case "$*" in
  *" -i")
    echo "NAME"
    echo "  Id: 5"
    echo "  Name: ubuntu.iso"
    echo "  State: Seeding"
    echo "  Percent Done: 100%"
    ;;
  *" -S")
    echo "localhost:9091/transmission/rpc/ responded: \"success\""
    ;;
esac
"#,
        args = dir.join("remote-args.txt").display()
    );
    write_script(dir, "transmission-remote", &script);
}

/// Runs `bin` with the fake-executable directory prepended to `PATH`.
fn run_with_fake_path(bin: &str, fake_dir: &Path, args: &[&str]) -> Output {
    let path = format!(
        "{}:{}",
        fake_dir.display(),
        std::env::var("PATH").unwrap_or_default()
    );
    Command::new(bin)
        .args(args)
        .env("PATH", path)
        .output()
        .expect("run binary")
}

#[test]
fn watch_requires_db_flag() {
    let dir = TempDir::new().unwrap();
    let output = run_with_fake_path(WATCH_BIN, dir.path(), &["--address", "localhost:9091"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--db"));
}

#[test]
fn watch_requires_address_flag() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("db.json");
    let output = run_with_fake_path(
        WATCH_BIN,
        dir.path(),
        &["--db", db.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--address"));
}

#[test]
fn watch_run_prints_report_and_records_notification() {
    let dir = TempDir::new().unwrap();
    install_fake_remote(dir.path());
    let db = dir.path().join("db.json");

    let output = run_with_fake_path(
        WATCH_BIN,
        dir.path(),
        &[
            "--address",
            "localhost:9091",
            "--db",
            db.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    // With no --email the report goes to stdout.
    assert!(stdout.contains("========= Finished ========="));
    assert!(stdout.contains("Name: ubuntu.iso"));

    // The notification timestamp was persisted.
    let db_contents = fs::read_to_string(&db).unwrap();
    assert!(db_contents.contains("ubuntu.iso"));
    assert!(db_contents.contains("Finished"));

    // A second run within the reminder threshold prints the listing but no
    // report section.
    let output = run_with_fake_path(
        WATCH_BIN,
        dir.path(),
        &[
            "--address",
            "localhost:9091",
            "--db",
            db.to_str().unwrap(),
        ],
    );
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Name: ubuntu.iso"));
    assert!(!stdout.contains("========= Finished ========="));
}

#[test]
fn watch_dump_db_prints_state_and_exits() {
    let dir = TempDir::new().unwrap();
    install_fake_remote(dir.path());
    let db = dir.path().join("db.json");

    // Seed the store with one run.
    run_with_fake_path(
        WATCH_BIN,
        dir.path(),
        &[
            "--address",
            "localhost:9091",
            "--db",
            db.to_str().unwrap(),
        ],
    );

    let output = run_with_fake_path(
        WATCH_BIN,
        dir.path(),
        &["--dump_db", "--db", db.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ubuntu.iso"));
    assert!(stdout.contains("Finished"));
    // Dump mode never contacts the daemon; only the seeding run did.
    let args = fs::read_to_string(dir.path().join("remote-args.txt")).unwrap();
    assert_eq!(args.lines().count(), 1);
}

#[test]
fn watch_dump_db_without_db_flag_is_an_empty_dump() {
    let dir = TempDir::new().unwrap();
    let output = run_with_fake_path(WATCH_BIN, dir.path(), &["--dump_db"]);

    // No store path means nothing recorded: print nothing, exit 0.
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn watch_sends_mail_when_recipient_given() {
    let dir = TempDir::new().unwrap();
    install_fake_remote(dir.path());
    let mail_script = format!(
        r#"#!/bin/sh
echo "$@" > "{args}"
cat > "{body}"
"#,
        args = dir.path().join("mail-args.txt").display(),
        body = dir.path().join("mail-body.txt").display()
    );
    write_script(dir.path(), "mail", &mail_script);
    let db = dir.path().join("db.json");

    let output = run_with_fake_path(
        WATCH_BIN,
        dir.path(),
        &[
            "--address",
            "localhost:9091",
            "--db",
            db.to_str().unwrap(),
            "--email",
            "admin@example.com",
        ],
    );

    assert_eq!(output.status.code(), Some(0));

    let args = fs::read_to_string(dir.path().join("mail-args.txt")).unwrap();
    assert_eq!(
        args.trim(),
        "-s Torrents need your attention admin@example.com"
    );
    let body = fs::read_to_string(dir.path().join("mail-body.txt")).unwrap();
    assert!(body.contains("========= Finished ========="));
    assert!(body.contains("Name: ubuntu.iso"));
}

#[test]
fn pause_requires_address_flag() {
    let dir = TempDir::new().unwrap();
    let output = run_with_fake_path(PAUSE_BIN, dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--address"));
}

#[test]
fn pause_stops_finished_running_torrents() {
    let dir = TempDir::new().unwrap();
    install_fake_remote(dir.path());

    let output = run_with_fake_path(PAUSE_BIN, dir.path(), &["--address", "localhost:9091"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Stopping the following torrents"));
    assert!(stdout.contains("ubuntu.iso Seeding"));

    let args = fs::read_to_string(dir.path().join("remote-args.txt")).unwrap();
    let lines: Vec<&str> = args.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "localhost:9091 -t all -i");
    assert_eq!(lines[1], "localhost:9091 -t 5 -S");
}

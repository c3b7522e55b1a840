//! Integration tests for the `transmission-remote` wrapper.
//!
//! These tests substitute a fake control executable (a shell script written
//! into a temporary directory) and drive the real subprocess paths: listing,
//! stopping, and the failure modes.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use transmission_watch::{RemoteError, TorrentRecord, TransmissionRemote, ALL_TORRENTS};

/// Writes an executable shell script into `dir` and returns its path.
fn write_script(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}

/// A fake `transmission-remote` that records its arguments and answers the
/// listing and stop modes with canned output.
fn fake_remote(dir: &Path) -> PathBuf {
    let args_file = dir.join("args.txt");
    let script = format!(
        r#"#!/bin/sh
echo "$@" >> "{args}"
case "$*" in
  *" -i")
    echo "NAME"
    echo "  Id: 1"
    echo "  Name: ubuntu-24.04-desktop-amd64.iso"
    echo "  Hash: 2c6b6858d61da9543d4231a71db4b1c9264b0685"
    echo "  State: Seeding"
    echo "  Percent Done: 100%"
    echo "  ETA: 0 seconds"
    echo "  Date added:       Wed Mar  2 23:22:05 2022"
    echo "  Date finished:    Thu Mar  3 01:14:44 2022"
    echo "  Latest activity:  Thu Mar  3 09:01:12 2022"
    echo ""
    echo "NAME"
    echo "  Id: 2"
    echo "  Name: fedora-40.iso"
    echo "  State: Stopped"
    echo "  Percent Done: 41.5%"
    ;;
  *" -S")
    echo "localhost:9091/transmission/rpc/ responded: \"success\""
    ;;
esac
"#,
        args = args_file.display()
    );
    write_script(dir, "transmission-remote", &script)
}

#[test]
fn list_parses_each_name_section() {
    let dir = TempDir::new().unwrap();
    let program = fake_remote(dir.path());

    let remote =
        TransmissionRemote::new("localhost:9091".into(), None, None).with_program(&program);
    let records = remote.list(ALL_TORRENTS).expect("listing succeeds");

    assert_eq!(records.len(), 2);

    let ubuntu = &records[0];
    assert_eq!(ubuntu.id, Some(1));
    assert_eq!(
        ubuntu.name.as_deref(),
        Some("ubuntu-24.04-desktop-amd64.iso")
    );
    assert!(ubuntu.is_finished());
    assert!(ubuntu.latest_activity.is_some());

    let fedora = &records[1];
    assert_eq!(fedora.id, Some(2));
    assert_eq!(fedora.percent_done, Some(41.5));
    assert!(fedora.is_stopped());
    assert_eq!(fedora.date_finished, None);
}

#[test]
fn list_passes_address_and_credentials() {
    let dir = TempDir::new().unwrap();
    let program = fake_remote(dir.path());

    let remote = TransmissionRemote::new(
        "seedbox:9091".into(),
        Some("user".into()),
        Some("pass".into()),
    )
    .with_program(&program);
    remote.list(ALL_TORRENTS).expect("listing succeeds");

    let args = fs::read_to_string(dir.path().join("args.txt")).unwrap();
    assert_eq!(args.trim(), "seedbox:9091 -n user:pass -t all -i");
}

#[test]
fn stop_joins_ids_and_reads_confirmation() {
    let dir = TempDir::new().unwrap();
    let program = fake_remote(dir.path());

    let remote =
        TransmissionRemote::new("localhost:9091".into(), None, None).with_program(&program);
    let torrents = vec![
        TorrentRecord {
            id: Some(3),
            ..TorrentRecord::default()
        },
        TorrentRecord {
            id: Some(7),
            ..TorrentRecord::default()
        },
    ];

    let confirmed = remote.stop(&torrents).expect("stop succeeds");
    assert!(confirmed);

    let args = fs::read_to_string(dir.path().join("args.txt")).unwrap();
    assert_eq!(args.trim(), "localhost:9091 -t 3,7 -S");
}

#[test]
fn stop_with_no_ids_skips_the_invocation() {
    let dir = TempDir::new().unwrap();
    let program = fake_remote(dir.path());

    let remote =
        TransmissionRemote::new("localhost:9091".into(), None, None).with_program(&program);
    let torrents = vec![TorrentRecord {
        name: Some("no-id".to_string()),
        ..TorrentRecord::default()
    }];

    let confirmed = remote.stop(&torrents).expect("stop succeeds");
    assert!(!confirmed);
    // The binary was never spawned, so the fake recorded no arguments.
    assert!(!dir.path().join("args.txt").exists());
}

#[test]
fn stop_without_confirmation_is_not_success() {
    let dir = TempDir::new().unwrap();
    let program = write_script(
        dir.path(),
        "transmission-remote",
        "#!/bin/sh\necho \"something unexpected happened\"\n",
    );

    let remote =
        TransmissionRemote::new("localhost:9091".into(), None, None).with_program(&program);
    let torrents = vec![TorrentRecord {
        id: Some(1),
        ..TorrentRecord::default()
    }];

    let confirmed = remote.stop(&torrents).expect("invocation succeeds");
    assert!(!confirmed);
}

#[test]
fn nonzero_exit_propagates_with_stderr() {
    let dir = TempDir::new().unwrap();
    let program = write_script(
        dir.path(),
        "transmission-remote",
        "#!/bin/sh\necho \"Couldn't connect to server\" >&2\nexit 3\n",
    );

    let remote =
        TransmissionRemote::new("localhost:9091".into(), None, None).with_program(&program);
    let err = remote.list(ALL_TORRENTS).unwrap_err();

    match err {
        RemoteError::ExitStatus { stderr, .. } => {
            assert!(stderr.contains("Couldn't connect to server"));
        }
        other => panic!("expected ExitStatus, got {other:?}"),
    }
}

#[test]
fn unparseable_section_is_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    let program = write_script(
        dir.path(),
        "transmission-remote",
        r#"#!/bin/sh
echo "NAME"
echo "  Id: 1"
echo "  Name: good"
echo "NAME"
echo "  Name: bad"
echo "  Latest activity:  not a date"
"#,
    );

    let remote =
        TransmissionRemote::new("localhost:9091".into(), None, None).with_program(&program);
    let records = remote.list(ALL_TORRENTS).expect("listing succeeds");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name.as_deref(), Some("good"));
}

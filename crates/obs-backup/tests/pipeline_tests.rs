//! End-to-end tests for backup creation and restore.

use chrono::NaiveDate;
use obs_backup::{
    find_previous, required_space, BackupEvent, BackupOrchestrator, BackupParams, Error,
    RestoreOrchestrator, RestoreOutcome, RestoreParams, SpaceProbe,
};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use tempfile::TempDir;

struct FixedSpace(u64);

impl SpaceProbe for FixedSpace {
    fn available_space(&self, _path: &Path) -> io::Result<u64> {
        Ok(self.0)
    }
}

fn small_vault() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("sub")).unwrap();
    fs::write(temp.path().join("a.txt"), "abc").unwrap();
    fs::write(temp.path().join("sub/b.txt"), "1234567").unwrap();
    temp
}

/// Content that does not compress away, so truncation lands mid-stream
fn noisy_bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

fn artifacts_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("backup-obsidian_") && n.ends_with(".tar.gz"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_small_vault_produces_one_artifact() {
    let vault = small_vault();
    let medium = TempDir::new().unwrap();
    let timestamp = NaiveDate::from_ymd_opt(2024, 5, 6)
        .unwrap()
        .and_hms_opt(12, 30, 45)
        .unwrap();

    assert_eq!(required_space(vault.path()).unwrap(), 11);

    let report = BackupOrchestrator::new(
        BackupParams::new(vault.path(), medium.path()).with_timestamp(timestamp),
    )
    .with_probe(FixedSpace(1000))
    .run()
    .unwrap();

    assert_eq!(report.budget.raw_bytes, 10);
    assert_eq!(report.budget.required_bytes, 11);
    assert_eq!(report.budget.available_bytes, 1000);
    assert_eq!(report.removed_previous, None);
    assert_eq!(
        artifacts_in(medium.path()),
        vec!["backup-obsidian_2024-05-06_12-30-45.tar.gz".to_string()]
    );
}

#[test]
fn test_second_run_rotates_previous_artifact() {
    let vault = small_vault();
    let medium = TempDir::new().unwrap();
    let first = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let second = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let first_report = BackupOrchestrator::new(
        BackupParams::new(vault.path(), medium.path()).with_timestamp(first),
    )
    .with_probe(FixedSpace(1000))
    .run()
    .unwrap();

    let second_report = BackupOrchestrator::new(
        BackupParams::new(vault.path(), medium.path()).with_timestamp(second),
    )
    .with_probe(FixedSpace(1000))
    .run()
    .unwrap();

    assert_eq!(
        second_report.removed_previous,
        Some(first_report.artifact_path)
    );
    assert_eq!(
        artifacts_in(medium.path()),
        vec!["backup-obsidian_2024-01-02_00-00-00.tar.gz".to_string()]
    );
}

#[test]
fn test_insufficient_space_aborts_after_rotation() {
    let vault = small_vault();
    let medium = TempDir::new().unwrap();
    let previous = medium
        .path()
        .join("backup-obsidian_2020-01-01_00-00-00.tar.gz");
    fs::write(&previous, "old backup").unwrap();

    let err = BackupOrchestrator::new(BackupParams::new(vault.path(), medium.path()))
        .with_probe(FixedSpace(10))
        .run()
        .unwrap_err();

    match err {
        Error::InsufficientSpace {
            required,
            available,
        } => {
            assert_eq!(required, 11);
            assert_eq!(available, 10);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!previous.exists());
    assert!(artifacts_in(medium.path()).is_empty());
}

#[test]
fn test_truncated_artifact_is_discarded() {
    let vault = TempDir::new().unwrap();
    fs::write(vault.path().join("big.bin"), noisy_bytes(256 * 1024, 7)).unwrap();
    fs::write(vault.path().join("note.md"), "# note").unwrap();
    let medium = TempDir::new().unwrap();

    let err = BackupOrchestrator::new(BackupParams::new(vault.path(), medium.path()))
        .with_probe(FixedSpace(u64::MAX))
        .on_event(|event| {
            if let BackupEvent::Encoded { artifact, bytes, .. } = event {
                OpenOptions::new()
                    .write(true)
                    .open(artifact)
                    .unwrap()
                    .set_len(bytes / 2)
                    .unwrap();
            }
        })
        .run()
        .unwrap_err();

    assert!(matches!(err, Error::VerifyFailed { .. }));
    assert!(artifacts_in(medium.path()).is_empty());
    assert_eq!(find_previous(medium.path()).unwrap(), None);
}

#[test]
fn test_backup_then_restore_round_trip() {
    let vault = TempDir::new().unwrap();
    fs::create_dir_all(vault.path().join("notes/daily")).unwrap();
    fs::create_dir_all(vault.path().join(".obsidian")).unwrap();
    fs::write(vault.path().join("notes/daily/2024-01-01.md"), "# Monday").unwrap();
    fs::write(vault.path().join(".obsidian/app.json"), "{}").unwrap();
    fs::write(vault.path().join("notes/weird?name*.png"), noisy_bytes(4096, 3)).unwrap();
    fs::write(vault.path().join("empty.md"), "").unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let script = vault.path().join("notes/tool.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o750)).unwrap();
    }

    let medium = TempDir::new().unwrap();
    BackupOrchestrator::new(
        BackupParams::new(vault.path(), medium.path()).with_payload_verification(true),
    )
    .with_probe(FixedSpace(u64::MAX))
    .run()
    .unwrap();

    let work = TempDir::new().unwrap();
    let target = work.path().join("restore");
    let outcome = RestoreOrchestrator::new(RestoreParams::new(medium.path(), &target))
        .run(|_| true)
        .unwrap();
    assert!(matches!(outcome, RestoreOutcome::Restored(_)));

    assert_eq!(
        fs::read_to_string(target.join("notes/daily/2024-01-01.md")).unwrap(),
        "# Monday"
    );
    assert_eq!(fs::read_to_string(target.join(".obsidian/app.json")).unwrap(), "{}");
    assert_eq!(
        fs::read(target.join("notes/weird-name-.png")).unwrap(),
        noisy_bytes(4096, 3)
    );
    assert_eq!(fs::read(target.join("empty.md")).unwrap(), Vec::<u8>::new());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(target.join("notes/tool.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o7777, 0o750);
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_names_survive_round_trip() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let vault = TempDir::new().unwrap();
    let e9 = OsStr::from_bytes(b"caf\xe9.md");
    let e8 = OsStr::from_bytes(b"caf\xe8?.md");
    fs::write(vault.path().join(e9), "one").unwrap();
    fs::write(vault.path().join(e8), "two").unwrap();

    let medium = TempDir::new().unwrap();
    let report = BackupOrchestrator::new(
        BackupParams::new(vault.path(), medium.path()).with_payload_verification(true),
    )
    .with_probe(FixedSpace(u64::MAX))
    .run()
    .unwrap();
    assert_eq!(report.encode.files, 2);
    assert_ne!(report.encode.digests[0].name, report.encode.digests[1].name);

    let work = TempDir::new().unwrap();
    let target = work.path().join("restore");
    RestoreOrchestrator::new(RestoreParams::new(medium.path(), &target))
        .run(|_| true)
        .unwrap();

    assert_eq!(fs::read_dir(&target).unwrap().count(), 2);
    assert_eq!(fs::read_to_string(target.join(e9)).unwrap(), "one");
    assert_eq!(
        fs::read_to_string(target.join(OsStr::from_bytes(b"caf\xe8-.md"))).unwrap(),
        "two"
    );
}

#[test]
fn test_restore_without_medium() {
    let work = TempDir::new().unwrap();
    let result = RestoreOrchestrator::new(RestoreParams::new(
        work.path().join("usb"),
        work.path().join("restore"),
    ))
    .run(|_| true);

    assert!(matches!(result, Err(Error::DestinationUnavailable { .. })));
}

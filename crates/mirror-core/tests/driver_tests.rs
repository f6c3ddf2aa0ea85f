//! Tests for the pull/diff/replay driver against the in-process remote

use std::cell::Cell;
use std::fs;

use mirror_core::{Error, LogLevel, MemoryLog, SyncDriver};
use mirror_fs::{NormalizedPath, PathResolver};
use mirror_git::{ChangeKind, ChangeRecord, SnapshotId, WorkingCopy};
use mirror_remote::{Connector, MemoryConnector, MemoryRemote, RemoteOp};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ============================================================================
// Fakes
// ============================================================================

struct FakeWorkingCopy {
    root: NormalizedPath,
    baseline: SnapshotId,
    new_head: SnapshotId,
    records: Vec<ChangeRecord>,
    fail_pull: bool,
    pulls: Cell<usize>,
}

impl FakeWorkingCopy {
    fn new(root: &std::path::Path, records: Vec<ChangeRecord>) -> Self {
        let new_head = if records.is_empty() { "aaaa" } else { "bbbb" };
        Self {
            root: NormalizedPath::new(root),
            baseline: SnapshotId::new("aaaa"),
            new_head: SnapshotId::new(new_head),
            records,
            fail_pull: false,
            pulls: Cell::new(0),
        }
    }
}

impl WorkingCopy for FakeWorkingCopy {
    fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn head(&self) -> mirror_git::Result<SnapshotId> {
        if self.pulls.get() == 0 {
            Ok(self.baseline.clone())
        } else {
            Ok(self.new_head.clone())
        }
    }

    fn pull(&self) -> mirror_git::Result<SnapshotId> {
        if self.fail_pull {
            return Err(mirror_git::Error::RemoteNotFound {
                name: "origin".into(),
            });
        }
        self.pulls.set(self.pulls.get() + 1);
        Ok(self.new_head.clone())
    }

    fn diff(
        &self,
        from: &SnapshotId,
        to: &SnapshotId,
    ) -> mirror_git::Result<Vec<ChangeRecord>> {
        if from == to {
            Ok(Vec::new())
        } else {
            Ok(self.records.clone())
        }
    }
}

struct RefusingConnector;

impl Connector for RefusingConnector {
    type Remote = MemoryRemote;

    fn connect(&self) -> mirror_remote::Result<MemoryRemote> {
        Err(mirror_remote::Error::AuthenticationFailed {
            username: "deploy".into(),
        })
    }
}

struct Setup {
    local: TempDir,
    connector: MemoryConnector,
    driver: SyncDriver<MemoryLog>,
}

fn setup() -> Setup {
    let local = TempDir::new().unwrap();
    let driver = SyncDriver::with_log(PathResolver::new(local.path()), MemoryLog::new());
    Setup {
        local,
        connector: MemoryConnector::new("/srv/www"),
        driver,
    }
}

fn write_local(setup: &Setup, relative: &str, content: &str) {
    let full = setup.local.path().join(relative);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

// ============================================================================
// Lazy connection
// ============================================================================

#[test]
fn test_empty_diff_opens_no_connection() {
    let s = setup();
    let wc = FakeWorkingCopy::new(s.local.path(), Vec::new());

    let report = s.driver.run(&wc, &s.connector).unwrap();

    assert!(report.is_up_to_date());
    assert!(!report.connected);
    assert_eq!(s.connector.connects(), 0);
    assert!(s.connector.ops().is_empty());
}

#[test]
fn test_pull_failure_is_setup_error_without_connection() {
    let s = setup();
    let mut wc = FakeWorkingCopy::new(s.local.path(), vec![ChangeRecord::added("a.txt", "1")]);
    wc.fail_pull = true;

    let result = s.driver.run(&wc, &s.connector);

    assert!(matches!(result, Err(Error::Git(_))));
    assert_eq!(s.connector.connects(), 0);
}

#[test]
fn test_connect_failure_is_setup_error() {
    let s = setup();
    let wc = FakeWorkingCopy::new(s.local.path(), vec![ChangeRecord::added("a.txt", "1")]);

    let result = s.driver.run(&wc, &RefusingConnector);

    assert!(matches!(result, Err(Error::Remote(_))));
}

#[test]
fn test_connection_released_after_run() {
    let s = setup();
    write_local(&s, "a.txt", "hello");
    let wc = FakeWorkingCopy::new(s.local.path(), vec![ChangeRecord::added("a.txt", "1")]);

    s.driver.run(&wc, &s.connector).unwrap();

    assert_eq!(s.connector.connects(), 1);
    assert_eq!(s.connector.disconnects(), 1);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_added_file_creates_parent_chain() {
    let s = setup();
    write_local(&s, "src/a.txt", "local content");
    let wc = FakeWorkingCopy::new(
        s.local.path(),
        vec![ChangeRecord::added("src/a.txt", "1")],
    );

    let report = s.driver.run(&wc, &s.connector).unwrap();

    assert_eq!(report.applied, 1);
    assert!(s.connector.is_dir("/srv/www/src"));
    assert_eq!(
        s.connector.file("/srv/www/src/a.txt").unwrap(),
        b"local content"
    );
    assert_eq!(
        s.connector.ops(),
        vec![
            RemoteOp::Mkdir("/srv/www/src".into()),
            RemoteOp::Upload("/srv/www/src/a.txt".into()),
        ]
    );
}

#[test]
fn test_deleted_file_is_removed() {
    let s = setup();
    s.connector.put_file("/srv/www/gone.txt", b"old");
    let wc = FakeWorkingCopy::new(
        s.local.path(),
        vec![ChangeRecord::deleted("gone.txt", "1")],
    );

    let report = s.driver.run(&wc, &s.connector).unwrap();

    assert_eq!(report.applied, 1);
    assert!(!s.connector.exists("/srv/www/gone.txt"));
}

#[test]
fn test_modified_file_is_deleted_then_uploaded() {
    let s = setup();
    s.connector.put_file("/srv/www/index.html", b"old content");
    write_local(&s, "index.html", "new content");
    let wc = FakeWorkingCopy::new(
        s.local.path(),
        vec![ChangeRecord::modified("index.html", "1", "2")],
    );

    s.driver.run(&wc, &s.connector).unwrap();

    assert_eq!(
        s.connector.ops(),
        vec![
            RemoteOp::Remove("/srv/www/index.html".into()),
            RemoteOp::Upload("/srv/www/index.html".into()),
        ]
    );
    assert_eq!(
        s.connector.file("/srv/www/index.html").unwrap(),
        b"new content"
    );
}

#[test]
fn test_modified_with_same_blob_does_nothing() {
    let s = setup();
    s.connector.put_file("/srv/www/index.html", b"old content");
    let wc = FakeWorkingCopy::new(
        s.local.path(),
        vec![ChangeRecord::modified("index.html", "same", "same")],
    );

    let report = s.driver.run(&wc, &s.connector).unwrap();

    assert_eq!(report.skipped, 1);
    assert!(s.connector.ops().is_empty());
}

#[test]
fn test_rename_with_missing_delete_target_still_uploads() {
    let s = setup();
    write_local(&s, "new.txt", "renamed");
    let wc = FakeWorkingCopy::new(
        s.local.path(),
        vec![ChangeRecord::renamed("old.txt", "new.txt", "1")],
    );

    let report = s.driver.run(&wc, &s.connector).unwrap();

    assert_eq!(report.applied, 1);
    assert!(report.failed.is_empty());
    assert_eq!(s.connector.file("/srv/www/new.txt").unwrap(), b"renamed");

    let warnings = s.driver.log().warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("/srv/www/old.txt"), "got: {warnings:?}");
}

#[test]
fn test_rename_removes_old_remote_path() {
    let s = setup();
    s.connector.put_file("/srv/www/old.txt", b"content");
    write_local(&s, "docs/new.txt", "content");
    let wc = FakeWorkingCopy::new(
        s.local.path(),
        vec![ChangeRecord::renamed("old.txt", "docs/new.txt", "1")],
    );

    s.driver.run(&wc, &s.connector).unwrap();

    assert!(!s.connector.exists("/srv/www/old.txt"));
    assert_eq!(s.connector.file("/srv/www/docs/new.txt").unwrap(), b"content");
}

#[test]
fn test_copied_file_is_uploaded_to_new_path() {
    let s = setup();
    s.connector.put_file("/srv/www/a.txt", b"same");
    write_local(&s, "b.txt", "same");
    let wc = FakeWorkingCopy::new(
        s.local.path(),
        vec![ChangeRecord::copied("a.txt", "b.txt", "1")],
    );

    s.driver.run(&wc, &s.connector).unwrap();

    assert_eq!(s.connector.file("/srv/www/a.txt").unwrap(), b"same");
    assert_eq!(s.connector.file("/srv/www/b.txt").unwrap(), b"same");
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_failed_record_does_not_stop_the_run() {
    let s = setup();
    write_local(&s, "b.txt", "second");
    let wc = FakeWorkingCopy::new(
        s.local.path(),
        vec![
            // Local file is missing, upload fails
            ChangeRecord::added("a.txt", "1"),
            ChangeRecord::added("b.txt", "2"),
        ],
    );

    let report = s.driver.run(&wc, &s.connector).unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.applied, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].path, "a.txt");
    assert_eq!(report.failed[0].kind, ChangeKind::Added);
    assert_eq!(s.connector.file("/srv/www/b.txt").unwrap(), b"second");

    let errors = s.driver.log().errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("a.txt") && errors[0].contains("added"));
}

#[test]
fn test_directory_conflict_fails_only_that_record() {
    let s = setup();
    s.connector.put_file("/srv/www/assets", b"a file where a dir should be");
    write_local(&s, "assets/logo.svg", "<svg/>");
    write_local(&s, "index.html", "<html/>");
    let wc = FakeWorkingCopy::new(
        s.local.path(),
        vec![
            ChangeRecord::added("assets/logo.svg", "1"),
            ChangeRecord::added("index.html", "2"),
        ],
    );

    let report = s.driver.run(&wc, &s.connector).unwrap();

    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].error.contains("/srv/www/assets"));
    assert_eq!(
        s.connector.file("/srv/www/assets").unwrap(),
        b"a file where a dir should be"
    );
    assert!(s.connector.exists("/srv/www/index.html"));
}

#[test]
fn test_flag_mismatch_is_skipped_with_warning() {
    let s = setup();
    let mut record = ChangeRecord::deleted("keep.txt", "1");
    record.is_new_file = true;
    s.connector.put_file("/srv/www/keep.txt", b"keep");
    let wc = FakeWorkingCopy::new(s.local.path(), vec![record]);

    let report = s.driver.run(&wc, &s.connector).unwrap();

    assert_eq!(report.skipped, 1);
    assert!(s.connector.exists("/srv/www/keep.txt"));
    assert!(
        s.driver
            .log()
            .lines()
            .iter()
            .any(|(level, msg)| *level == LogLevel::Warn && msg.contains("keep.txt"))
    );
}

#[test]
fn test_replaying_added_twice_keeps_latest_content() {
    let s = setup();
    let records = vec![ChangeRecord::added("a.txt", "1")];

    write_local(&s, "a.txt", "first");
    s.driver
        .run(&FakeWorkingCopy::new(s.local.path(), records.clone()), &s.connector)
        .unwrap();

    write_local(&s, "a.txt", "second");
    s.driver
        .run(&FakeWorkingCopy::new(s.local.path(), records), &s.connector)
        .unwrap();

    assert_eq!(s.connector.file("/srv/www/a.txt").unwrap(), b"second");
    assert_eq!(
        s.connector
            .ops()
            .iter()
            .filter(|op| matches!(op, RemoteOp::Upload(_)))
            .count(),
        2
    );
}

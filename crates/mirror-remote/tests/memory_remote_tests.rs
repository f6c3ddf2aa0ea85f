//! Behavioural tests for the in-process remote

use std::fs;

use mirror_fs::NormalizedPath;
use mirror_remote::{
    Connector, Error, MemoryConnector, RemoteEntry, RemoteFs, RemoteOp, RemoveOutcome,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

fn path(s: &str) -> NormalizedPath {
    NormalizedPath::new(s)
}

#[test]
fn test_working_dir_exists_on_connect() {
    let connector = MemoryConnector::new("/home/deploy/site");
    let mut remote = connector.connect().unwrap();

    assert_eq!(remote.working_dir().as_str(), "/home/deploy/site");
    assert_eq!(
        remote.stat(&path("/home/deploy/site")).unwrap(),
        RemoteEntry::Directory
    );
}

#[rstest]
#[case("/srv/file.txt", RemoteEntry::Other)]
#[case("/srv", RemoteEntry::Directory)]
#[case("/srv/missing", RemoteEntry::Missing)]
fn test_stat(#[case] target: &str, #[case] expected: RemoteEntry) {
    let connector = MemoryConnector::new("/srv");
    connector.put_file("/srv/file.txt", b"x");
    let mut remote = connector.connect().unwrap();

    assert_eq!(remote.stat(&path(target)).unwrap(), expected);
}

#[test]
fn test_create_dir_all_records_each_new_level() {
    let connector = MemoryConnector::new("/srv");
    let mut remote = connector.connect().unwrap();

    remote.create_dir_all(&path("/srv/a/b/c")).unwrap();

    assert_eq!(
        connector.ops(),
        vec![
            RemoteOp::Mkdir("/srv/a".into()),
            RemoteOp::Mkdir("/srv/a/b".into()),
            RemoteOp::Mkdir("/srv/a/b/c".into()),
        ]
    );
    assert!(connector.is_dir("/srv/a/b/c"));
}

#[test]
fn test_create_dir_all_through_file_fails() {
    let connector = MemoryConnector::new("/srv");
    connector.put_file("/srv/a", b"not a dir");
    let mut remote = connector.connect().unwrap();

    let err = remote.create_dir_all(&path("/srv/a/b")).unwrap_err();
    match err {
        Error::NotADirectory { path } => assert_eq!(path, "/srv/a"),
        other => panic!("expected NotADirectory, got {other:?}"),
    }
}

#[test]
fn test_remove_missing_file_reports_not_found() {
    let connector = MemoryConnector::new("/srv");
    let mut remote = connector.connect().unwrap();

    let outcome = remote.remove_file(&path("/srv/ghost.txt")).unwrap();
    assert_eq!(outcome, RemoveOutcome::NotFound);
    assert!(connector.ops().is_empty());
}

#[test]
fn test_upload_overwrites_existing_file() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("a.txt");
    fs::write(&local, "second").unwrap();

    let connector = MemoryConnector::new("/srv");
    connector.put_file("/srv/a.txt", b"first");
    let mut remote = connector.connect().unwrap();

    let bytes = remote
        .upload(&NormalizedPath::new(&local), &path("/srv/a.txt"))
        .unwrap();

    assert_eq!(bytes, 6);
    assert_eq!(connector.file("/srv/a.txt").unwrap(), b"second");
}

#[test]
fn test_upload_missing_local_file_fails() {
    let temp = TempDir::new().unwrap();
    let connector = MemoryConnector::new("/srv");
    let mut remote = connector.connect().unwrap();

    let result = remote.upload(
        &NormalizedPath::new(temp.path().join("nope.txt")),
        &path("/srv/nope.txt"),
    );
    assert!(matches!(result, Err(Error::Io { .. })));
    assert!(!connector.exists("/srv/nope.txt"));
}

//! Change records produced by diffing two tree snapshots

use std::fmt;

/// Opaque identifier of a complete tree state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotId(String);

impl SnapshotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<git2::Oid> for SnapshotId {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

/// The kind of change a diff reports for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Deleted,
    Copied,
    Renamed,
    Modified,
    /// Anything git reports that has no mirror counterpart
    /// (type changes, conflicts, unreadable entries, ...).
    Unclassified,
}

impl ChangeKind {
    /// Single-letter status code as printed by `git diff --name-status`.
    pub fn code(&self) -> char {
        match self {
            Self::Added => 'A',
            Self::Deleted => 'D',
            Self::Copied => 'C',
            Self::Renamed => 'R',
            Self::Modified => 'M',
            Self::Unclassified => '?',
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Copied => "copied",
            Self::Renamed => "renamed",
            Self::Modified => "modified",
            Self::Unclassified => "unclassified",
        };
        f.write_str(name)
    }
}

/// One file-level difference between two tree snapshots.
///
/// The boolean flags are derived independently of `kind` from which sides
/// of the diff exist, so a record whose flags disagree with its kind can
/// be detected and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    /// Path on the baseline side, absent for added files.
    pub old_path: Option<String>,
    /// Path on the new side, absent for deleted files.
    pub new_path: Option<String>,
    pub is_new_file: bool,
    pub is_deleted_file: bool,
    pub is_copied_file: bool,
    pub is_renamed: bool,
    /// Blob id on the baseline side.
    pub old_content_id: Option<String>,
    /// Blob id on the new side.
    pub new_content_id: Option<String>,
}

impl ChangeRecord {
    /// The path this record is reported under: the baseline side when it
    /// exists, otherwise the new side.
    pub fn relative_path(&self) -> &str {
        self.old_path
            .as_deref()
            .or(self.new_path.as_deref())
            .unwrap_or_default()
    }

    pub fn added(path: &str, content_id: &str) -> Self {
        Self {
            kind: ChangeKind::Added,
            old_path: None,
            new_path: Some(path.to_string()),
            is_new_file: true,
            is_deleted_file: false,
            is_copied_file: false,
            is_renamed: false,
            old_content_id: None,
            new_content_id: Some(content_id.to_string()),
        }
    }

    pub fn deleted(path: &str, content_id: &str) -> Self {
        Self {
            kind: ChangeKind::Deleted,
            old_path: Some(path.to_string()),
            new_path: None,
            is_new_file: false,
            is_deleted_file: true,
            is_copied_file: false,
            is_renamed: false,
            old_content_id: Some(content_id.to_string()),
            new_content_id: None,
        }
    }

    pub fn modified(path: &str, old_content_id: &str, new_content_id: &str) -> Self {
        Self {
            kind: ChangeKind::Modified,
            old_path: Some(path.to_string()),
            new_path: Some(path.to_string()),
            is_new_file: false,
            is_deleted_file: false,
            is_copied_file: false,
            is_renamed: false,
            old_content_id: Some(old_content_id.to_string()),
            new_content_id: Some(new_content_id.to_string()),
        }
    }

    pub fn renamed(from: &str, to: &str, content_id: &str) -> Self {
        Self {
            kind: ChangeKind::Renamed,
            old_path: Some(from.to_string()),
            new_path: Some(to.to_string()),
            is_new_file: false,
            is_deleted_file: false,
            is_copied_file: false,
            is_renamed: true,
            old_content_id: Some(content_id.to_string()),
            new_content_id: Some(content_id.to_string()),
        }
    }

    pub fn copied(from: &str, to: &str, content_id: &str) -> Self {
        Self {
            kind: ChangeKind::Copied,
            old_path: Some(from.to_string()),
            new_path: Some(to.to_string()),
            is_new_file: false,
            is_deleted_file: false,
            is_copied_file: true,
            is_renamed: false,
            old_content_id: Some(content_id.to_string()),
            new_content_id: Some(content_id.to_string()),
        }
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.old_path, &self.new_path) {
            (Some(old), Some(new)) if old != new => {
                write!(f, "{} {} -> {}", self.kind.code(), old, new)
            }
            _ => write!(f, "{} {}", self.kind.code(), self.relative_path()),
        }
    }
}

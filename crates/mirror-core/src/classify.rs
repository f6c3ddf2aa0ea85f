//! Mapping of change records to remote actions
//!
//! | kind     | guard                         | plan                     |
//! |----------|-------------------------------|--------------------------|
//! | Added    | new-file flag                 | upload                   |
//! | Deleted  | deleted-file flag             | delete                   |
//! | Copied   | copied-file flag              | upload                   |
//! | Renamed  | renamed flag                  | delete old, upload new   |
//! | Modified | both blob ids, and they differ| delete, upload           |
//! | other    |                               | no-op                    |
//!
//! The remote has no atomic replace, so every content change that hits an
//! existing remote path is a delete followed by an upload.

use mirror_git::{ChangeKind, ChangeRecord};

/// One remote operation, addressed by repository-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send the local file at `path` to the same path on the remote.
    Upload { path: String },
    /// Remove `path` from the remote.
    Delete { path: String },
}

/// Why a record produces no remote action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoopReason {
    /// The boolean flags contradict the change kind.
    FlagMismatch,
    /// Modified, but the blob ids are equal or one is missing.
    UnchangedContent,
    /// The record has no path for the side it needs.
    MissingPath,
    /// A change kind the mirror has no counterpart for.
    Unclassified,
}

impl std::fmt::Display for NoopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::FlagMismatch => "flags disagree with change kind",
            Self::UnchangedContent => "content unchanged",
            Self::MissingPath => "no path for the required side",
            Self::Unclassified => "unclassified change",
        };
        f.write_str(text)
    }
}

/// The complete action sequence for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionPlan {
    Upload { path: String },
    Delete { path: String },
    /// Delete `delete`, then upload `upload`. The two are equal for a
    /// modification and differ for a rename.
    Replace { delete: String, upload: String },
    /// Nothing to do. Kept explicit so skipped records are visible.
    Noop(NoopReason),
}

impl ActionPlan {
    /// Actions in execution order; empty for [`ActionPlan::Noop`].
    pub fn actions(&self) -> Vec<Action> {
        match self {
            Self::Upload { path } => vec![Action::Upload { path: path.clone() }],
            Self::Delete { path } => vec![Action::Delete { path: path.clone() }],
            Self::Replace { delete, upload } => vec![
                Action::Delete {
                    path: delete.clone(),
                },
                Action::Upload {
                    path: upload.clone(),
                },
            ],
            Self::Noop(_) => Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Noop(_))
    }
}

/// Whether the flags corroborate `record.kind` and nothing else.
fn flags_agree(record: &ChangeRecord) -> bool {
    let flags = (
        record.is_new_file,
        record.is_deleted_file,
        record.is_copied_file,
        record.is_renamed,
    );
    match record.kind {
        ChangeKind::Added => flags == (true, false, false, false),
        ChangeKind::Deleted => flags == (false, true, false, false),
        ChangeKind::Copied => flags == (false, false, true, false),
        ChangeKind::Renamed => flags == (false, false, false, true),
        ChangeKind::Modified => flags == (false, false, false, false),
        ChangeKind::Unclassified => true,
    }
}

fn non_empty(path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty()).map(str::to_string)
}

/// Select the action plan for one change record.
///
/// Deterministic and side-effect free. Records whose flags disagree with
/// their kind yield [`NoopReason::FlagMismatch`] rather than a guess.
pub fn classify(record: &ChangeRecord) -> ActionPlan {
    if record.kind == ChangeKind::Unclassified {
        return ActionPlan::Noop(NoopReason::Unclassified);
    }
    if !flags_agree(record) {
        return ActionPlan::Noop(NoopReason::FlagMismatch);
    }

    let old = non_empty(record.old_path.as_deref());
    let new = non_empty(record.new_path.as_deref());

    let plan = match record.kind {
        ChangeKind::Added | ChangeKind::Copied => new.map(|path| ActionPlan::Upload { path }),
        ChangeKind::Deleted => old.map(|path| ActionPlan::Delete { path }),
        ChangeKind::Renamed => old
            .zip(new)
            .map(|(delete, upload)| ActionPlan::Replace { delete, upload }),
        ChangeKind::Modified => {
            match (&record.old_content_id, &record.new_content_id) {
                (Some(a), Some(b)) if a != b => {}
                _ => return ActionPlan::Noop(NoopReason::UnchangedContent),
            }
            new.or(old).map(|path| ActionPlan::Replace {
                delete: path.clone(),
                upload: path,
            })
        }
        ChangeKind::Unclassified => None,
    };

    plan.unwrap_or(ActionPlan::Noop(NoopReason::MissingPath))
}

/// Classify every record, keeping diff order.
pub fn plan_all(records: &[ChangeRecord]) -> Vec<(&ChangeRecord, ActionPlan)> {
    records.iter().map(|r| (r, classify(r))).collect()
}

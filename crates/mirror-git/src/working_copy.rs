//! git2-backed working copy

use std::path::Path;

use git2::build::CheckoutBuilder;
use git2::{Delta, DiffDelta, DiffFindOptions, DiffOptions, ErrorCode, Oid, Repository};
use mirror_fs::NormalizedPath;

use crate::{ChangeKind, ChangeRecord, Error, Result, SnapshotId, provider::WorkingCopy};

/// Default remote pulled from when none is configured.
pub const DEFAULT_REMOTE: &str = "origin";

/// A non-bare git repository with a checked-out working tree.
pub struct GitWorkingCopy {
    repo: Repository,
    root: NormalizedPath,
    remote: String,
    branch: Option<String>,
}

impl GitWorkingCopy {
    /// Open the repository whose working tree is at `path`.
    ///
    /// Fails when `path` is not a repository or the repository is bare.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|e| match e.code() {
            ErrorCode::NotFound => Error::NotARepository {
                path: path.to_path_buf(),
            },
            _ => Error::Git(e),
        })?;

        if repo.is_bare() {
            return Err(Error::BareRepository {
                path: path.to_path_buf(),
            });
        }

        let workdir = repo.workdir().ok_or_else(|| Error::BareRepository {
            path: path.to_path_buf(),
        })?;
        let root = NormalizedPath::new(workdir.to_string_lossy().trim_end_matches(['/', '\\']));

        Ok(Self {
            repo,
            root,
            remote: DEFAULT_REMOTE.to_string(),
            branch: None,
        })
    }

    /// Pull from `remote` instead of `origin`.
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Fetch `branch` from the remote instead of the checked-out branch's
    /// name. The result is still fast-forwarded into the checked-out branch.
    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    /// Get the current branch name.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;

        if head.is_branch() {
            Ok(head.shorthand().unwrap_or("HEAD").to_string())
        } else {
            Err(Error::DetachedHead)
        }
    }

    fn find_tree(&self, id: &SnapshotId) -> Result<git2::Tree<'_>> {
        let oid = Oid::from_str(id.as_str()).map_err(|_| Error::InvalidSnapshot {
            id: id.to_string(),
        })?;
        Ok(self.repo.find_tree(oid)?)
    }
}

impl WorkingCopy for GitWorkingCopy {
    fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn head(&self) -> Result<SnapshotId> {
        let tree = self.repo.head()?.peel_to_tree()?;
        Ok(SnapshotId::from(tree.id()))
    }

    fn pull(&self) -> Result<SnapshotId> {
        let current = self.current_branch()?;
        let branch_name = self.branch.clone().unwrap_or_else(|| current.clone());

        let mut remote = self
            .repo
            .find_remote(&self.remote)
            .map_err(|_| Error::RemoteNotFound {
                name: self.remote.clone(),
            })?;

        tracing::info!(remote = %self.remote, branch = %branch_name, "Fetching");
        remote
            .fetch(&[&branch_name], None, None)
            .map_err(|e| Error::PullFailed {
                message: format!("Fetch failed: {}", e.message()),
            })?;

        let fetch_head = self
            .repo
            .find_reference("FETCH_HEAD")
            .map_err(|e| Error::PullFailed {
                message: format!("Could not find FETCH_HEAD: {}", e.message()),
            })?;

        let fetch_commit = fetch_head.peel_to_commit().map_err(|e| Error::PullFailed {
            message: format!("Could not resolve FETCH_HEAD: {}", e.message()),
        })?;

        let head_ref = self.repo.head()?;
        let head_commit = head_ref.peel_to_commit()?;

        let (merge_analysis, _) = self
            .repo
            .merge_analysis(&[&self.repo.find_annotated_commit(fetch_commit.id())?])?;

        if merge_analysis.is_up_to_date() {
            tracing::info!(commit = %head_commit.id(), "Already up to date");
            return self.head();
        }

        if merge_analysis.is_fast_forward() {
            // Checked out against the old HEAD: untouched local edits survive,
            // edits to files the pull changes abort it.
            self.repo
                .checkout_tree(fetch_commit.as_object(), Some(CheckoutBuilder::default().safe()))
                .map_err(|e| match e.code() {
                    ErrorCode::Conflict => Error::PullFailed {
                        message: format!("Local changes would be overwritten: {}", e.message()),
                    },
                    _ => Error::Git(e),
                })?;

            let mut reference = head_ref.resolve()?;
            reference.set_target(
                fetch_commit.id(),
                &format!("pull: fast-forward to {}", fetch_commit.id()),
            )?;

            tracing::info!(
                from = %head_commit.id(),
                to = %fetch_commit.id(),
                "Fast-forwarded"
            );
            return self.head();
        }

        Err(Error::CannotFastForward {
            message: format!(
                "Cannot fast-forward {} to {}/{} ({} -> {}). Manual merge required.",
                current,
                self.remote,
                branch_name,
                head_commit.id(),
                fetch_commit.id()
            ),
        })
    }

    fn diff(&self, from: &SnapshotId, to: &SnapshotId) -> Result<Vec<ChangeRecord>> {
        if from == to {
            return Ok(Vec::new());
        }

        let old_tree = self.find_tree(from)?;
        let new_tree = self.find_tree(to)?;

        let mut opts = DiffOptions::new();
        let mut diff = self
            .repo
            .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), Some(&mut opts))?;

        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true).copies(true);
        diff.find_similar(Some(&mut find_opts))?;

        let records: Vec<ChangeRecord> = diff.deltas().map(|d| record_from_delta(&d)).collect();
        tracing::debug!(%from, %to, count = records.len(), "Computed diff");
        Ok(records)
    }
}

fn record_from_delta(delta: &DiffDelta<'_>) -> ChangeRecord {
    let old = delta.old_file();
    let new = delta.new_file();

    let old_path = old.exists().then(|| old.path().map(path_to_string)).flatten();
    let new_path = new.exists().then(|| new.path().map(path_to_string)).flatten();

    let kind = match delta.status() {
        Delta::Added => ChangeKind::Added,
        Delta::Deleted => ChangeKind::Deleted,
        Delta::Modified => ChangeKind::Modified,
        Delta::Renamed => ChangeKind::Renamed,
        Delta::Copied => ChangeKind::Copied,
        _ => ChangeKind::Unclassified,
    };

    let moved = matches!((&old_path, &new_path), (Some(a), Some(b)) if a != b);

    ChangeRecord {
        kind,
        is_new_file: old_path.is_none() && new_path.is_some(),
        is_deleted_file: old_path.is_some() && new_path.is_none(),
        is_copied_file: moved && delta.status() == Delta::Copied,
        is_renamed: moved && delta.status() != Delta::Copied,
        old_content_id: content_id(old.exists(), old.id()),
        new_content_id: content_id(new.exists(), new.id()),
        old_path,
        new_path,
    }
}

fn content_id(exists: bool, id: Oid) -> Option<String> {
    (exists && !id.is_zero()).then(|| id.to_string())
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

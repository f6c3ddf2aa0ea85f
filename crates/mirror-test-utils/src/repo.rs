//! [`PullFixture`] for pull-then-diff scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::git::{commit_all, configure_identity, git, real_git_repo_with_commit, write_file};

/// An `upstream` repository and a `local` clone of it, side by side in a
/// temporary directory.
///
/// Tests commit to upstream and then pull from the local clone, which
/// tracks upstream as `origin`.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::PullFixture;
///
/// let fixture = PullFixture::new();
/// fixture.upstream_write("src/a.txt", "hello");
/// fixture.upstream_commit("add a");
/// ```
pub struct PullFixture {
    _temp_dir: TempDir,
    upstream: PathBuf,
    local: PathBuf,
}

impl Default for PullFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl PullFixture {
    /// Create upstream with an initial commit and clone it.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let upstream = temp_dir.path().join("upstream");
        let local = temp_dir.path().join("local");
        fs::create_dir_all(&upstream).unwrap();

        real_git_repo_with_commit(&upstream);
        git(temp_dir.path(), &["clone", "upstream", "local"]);
        configure_identity(&local);

        Self {
            _temp_dir: temp_dir,
            upstream,
            local,
        }
    }

    pub fn local(&self) -> &Path {
        &self.local
    }

    pub fn upstream_write(&self, relative: &str, content: &str) {
        write_file(&self.upstream, relative, content);
    }

    pub fn upstream_remove(&self, relative: &str) {
        git(&self.upstream, &["rm", "-q", relative]);
    }

    pub fn upstream_rename(&self, from: &str, to: &str) {
        if let Some(parent) = self.upstream.join(to).parent() {
            fs::create_dir_all(parent).unwrap();
        }
        git(&self.upstream, &["mv", from, to]);
    }

    pub fn upstream_commit(&self, message: &str) {
        commit_all(&self.upstream, message);
    }

    /// Switch upstream to `branch`, creating it from the current commit
    /// when `create` is set.
    pub fn upstream_checkout(&self, branch: &str, create: bool) {
        if create {
            git(&self.upstream, &["checkout", "-q", "-b", branch]);
        } else {
            git(&self.upstream, &["checkout", "-q", branch]);
        }
    }

    /// Edit a file in the local clone without committing it.
    pub fn local_write(&self, relative: &str, content: &str) {
        write_file(&self.local, relative, content);
    }

    /// Read a file from the local clone.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn local_read(&self, relative: &str) -> String {
        let full = self.local.join(relative);
        fs::read_to_string(&full)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full.display()))
    }
}

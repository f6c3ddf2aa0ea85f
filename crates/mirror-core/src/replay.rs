//! Execution of action plans against a remote session

use mirror_fs::{NormalizedPath, PathResolver, directory_of};
use mirror_remote::{RemoteFs, RemoveOutcome};

use crate::{
    ReplayError,
    classify::{Action, ActionPlan},
    log::SyncLog,
};

/// Executes action plans. The remote session is passed to every call and
/// never retained.
pub struct Replayer<'a, L: SyncLog + ?Sized> {
    resolver: &'a PathResolver,
    log: &'a L,
}

impl<'a, L: SyncLog + ?Sized> Replayer<'a, L> {
    pub fn new(resolver: &'a PathResolver, log: &'a L) -> Self {
        Self { resolver, log }
    }

    /// Send `local` to `remote_path`, creating the remote parent chain
    /// first. Overwrites an existing file at `remote_path`.
    pub fn upload<R: RemoteFs + ?Sized>(
        &self,
        remote: &mut R,
        local: &NormalizedPath,
        remote_path: &NormalizedPath,
    ) -> Result<u64, ReplayError> {
        let directory = directory_of(remote_path)?;
        if !crate::ensure(remote, &directory, true)? {
            return Err(ReplayError::RemoteDirectoryConflict {
                path: directory.to_string(),
            });
        }
        Ok(remote.upload(local, remote_path)?)
    }

    /// Remove `remote_path`. A path that is already gone is logged as a
    /// warning and counts as success.
    pub fn delete<R: RemoteFs + ?Sized>(
        &self,
        remote: &mut R,
        remote_path: &NormalizedPath,
    ) -> Result<RemoveOutcome, ReplayError> {
        let outcome = remote.remove_file(remote_path)?;
        if outcome == RemoveOutcome::NotFound {
            self.log.warn(&format!(
                "Tried to remove '{remote_path}', but got a \"not found\" error."
            ));
        }
        Ok(outcome)
    }

    /// Run every action of `plan` in order, stopping at the first failure.
    pub fn apply<R: RemoteFs + ?Sized>(
        &self,
        remote: &mut R,
        plan: &ActionPlan,
    ) -> Result<(), ReplayError> {
        let remote_root = remote.working_dir().clone();
        for action in plan.actions() {
            match action {
                Action::Upload { path } => {
                    let local = self.resolver.to_local_absolute(&path);
                    let target = self.resolver.to_remote_absolute(&remote_root, &path);
                    self.upload(remote, &local, &target)?;
                }
                Action::Delete { path } => {
                    let target = self.resolver.to_remote_absolute(&remote_root, &path);
                    self.delete(remote, &target)?;
                }
            }
        }
        Ok(())
    }
}

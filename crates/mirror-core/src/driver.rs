//! Pull, diff and replay orchestration

use mirror_fs::PathResolver;
use mirror_git::{ChangeKind, ChangeRecord, SnapshotId, WorkingCopy};
use mirror_remote::Connector;

use crate::{
    Result,
    classify::{ActionPlan, NoopReason, classify},
    log::{SyncLog, TracingLog},
    replay::Replayer,
};

/// Result of the version-control half of a run.
#[derive(Debug, Clone)]
pub struct PulledChanges {
    pub baseline: SnapshotId,
    pub new_head: SnapshotId,
    /// In diff order.
    pub records: Vec<ChangeRecord>,
}

/// A record whose replay failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRecord {
    pub path: String,
    pub kind: ChangeKind,
    pub error: String,
}

/// What a run did.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub baseline: SnapshotId,
    pub new_head: SnapshotId,
    /// Whether a remote session was opened.
    pub connected: bool,
    pub total: usize,
    pub applied: usize,
    pub skipped: usize,
    pub failed: Vec<FailedRecord>,
}

impl SyncReport {
    fn new(changes: &PulledChanges) -> Self {
        Self {
            baseline: changes.baseline.clone(),
            new_head: changes.new_head.clone(),
            connected: false,
            total: changes.records.len(),
            applied: 0,
            skipped: 0,
            failed: Vec::new(),
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        self.total == 0
    }
}

/// Mirrors a pull onto a remote filesystem.
///
/// Single-threaded and strictly sequential: one pull, at most one remote
/// session, one pass over the change records in diff order.
pub struct SyncDriver<L: SyncLog = TracingLog> {
    resolver: PathResolver,
    log: L,
}

impl SyncDriver<TracingLog> {
    pub fn new(resolver: PathResolver) -> Self {
        Self::with_log(resolver, TracingLog)
    }
}

impl<L: SyncLog> SyncDriver<L> {
    pub fn with_log(resolver: PathResolver, log: L) -> Self {
        Self { resolver, log }
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Pull and replay.
    ///
    /// Errors returned here are setup failures (repository, pull,
    /// connection). Per-record failures end up in [`SyncReport::failed`].
    pub fn run<W, C>(&self, working_copy: &W, connector: &C) -> Result<SyncReport>
    where
        W: WorkingCopy + ?Sized,
        C: Connector + ?Sized,
    {
        let changes = self.pull(working_copy)?;
        self.replay(&changes, connector)
    }

    /// Record the baseline, pull, and diff baseline against the new head.
    pub fn pull<W: WorkingCopy + ?Sized>(&self, working_copy: &W) -> Result<PulledChanges> {
        let baseline = working_copy.head()?;
        let new_head = working_copy.pull()?;
        let records = working_copy.diff(&baseline, &new_head)?;

        self.log.info(&format!(
            "Pulled {} -> {}: {} change(s)",
            short(&baseline),
            short(&new_head),
            records.len()
        ));

        Ok(PulledChanges {
            baseline,
            new_head,
            records,
        })
    }

    /// Replay `changes` on a remote opened from `connector`.
    ///
    /// No session is opened when there are no records. The session is
    /// released when this returns, on every path.
    pub fn replay<C: Connector + ?Sized>(
        &self,
        changes: &PulledChanges,
        connector: &C,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::new(changes);
        if changes.records.is_empty() {
            self.log.info("Nothing to sync");
            return Ok(report);
        }

        let mut remote = connector.connect()?;
        report.connected = true;

        let replayer = Replayer::new(&self.resolver, &self.log);

        for record in &changes.records {
            let plan = classify(record);

            if let ActionPlan::Noop(reason) = plan {
                self.log_skip(record, reason);
                report.skipped += 1;
                continue;
            }

            match replayer.apply(&mut remote, &plan) {
                Ok(()) => {
                    self.log.info(&format!("Replayed {record}"));
                    report.applied += 1;
                }
                Err(e) => {
                    self.log.error(&format!(
                        "Failed to replay {} change of '{}': {e}",
                        record.kind,
                        record.relative_path()
                    ));
                    report.failed.push(FailedRecord {
                        path: record.relative_path().to_string(),
                        kind: record.kind,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    fn log_skip(&self, record: &ChangeRecord, reason: NoopReason) {
        let message = format!("Skipping {record}: {reason}");
        match reason {
            NoopReason::FlagMismatch | NoopReason::MissingPath => self.log.warn(&message),
            NoopReason::UnchangedContent | NoopReason::Unclassified => self.log.info(&message),
        }
    }
}

fn short(id: &SnapshotId) -> &str {
    let s = id.as_str();
    s.get(..7).unwrap_or(s)
}

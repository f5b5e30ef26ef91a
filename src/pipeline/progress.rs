//! Progress reporting for batch runs.
//!
//! The orchestrator calls the reporter once per finished contest, in
//! completion order, so `completed` only ever increases.

use crate::models::{ContestId, Outcome};

/// Snapshot emitted each time a contest job reaches a terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Jobs finished so far, including this one.
    pub completed: usize,
    /// Jobs in the batch.
    pub total: usize,
    /// Contest that just finished.
    pub contest: ContestId,
    pub outcome: Outcome,
}

impl Progress {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }
}

/// Observer of batch progress.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, progress: &Progress);
}

/// Writes one log line per finished contest.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, progress: &Progress) {
        log::info!(
            "[{}/{}] ({:.0}%) contest {}: {}",
            progress.completed,
            progress.total,
            progress.fraction() * 100.0,
            progress.contest,
            progress.outcome
        );
    }
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _progress: &Progress) {}
}

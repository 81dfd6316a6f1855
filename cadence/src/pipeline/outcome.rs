//! Per-task outcomes and stage reports.

use crate::domain::{RecordId, Task};

use super::failures::FailureKind;

/// A single task's failure within a stage.
#[derive(Debug, Clone)]
pub struct TaskFailure {
    /// Identifier of the failed task.
    pub id: RecordId,
    /// Display name of the failed task.
    pub name: String,
    /// The carded failure kind, or `None` for store failures that are only
    /// logged (the next run retries them).
    pub kind: Option<FailureKind>,
    /// Human-readable failure detail.
    pub detail: String,
}

/// Settled outcome of one stage over one batch.
///
/// `succeeded` preserves the tasks that completed the stage's mutation (or
/// legitimately skipped it) and feeds the next stage; `failed` records which
/// tasks dropped out and why.
#[derive(Debug, Default)]
pub struct StageReport {
    /// Tasks that passed the stage.
    pub succeeded: Vec<Task>,
    /// Tasks that failed the stage, with their identifiers.
    pub failed: Vec<TaskFailure>,
}

impl FromIterator<Result<Task, TaskFailure>> for StageReport {
    fn from_iter<I: IntoIterator<Item = Result<Task, TaskFailure>>>(outcomes: I) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            match outcome {
                Ok(task) => report.succeeded.push(task),
                Err(failure) => report.failed.push(failure),
            }
        }
        report
    }
}

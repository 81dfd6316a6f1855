//! Status transitions out of lifecycle buckets.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::{Bucket, StatusKind, Task};
use crate::store::record::{single_property, status_value, STATUS_PROPERTY};
use crate::store::TaskStore;

use super::failures::{FailureKind, FailureTracker};
use super::outcome::{StageReport, TaskFailure};

/// Moves tasks between lifecycle buckets by rewriting their status field.
pub struct ArchivalStage {
    store: Arc<dyn TaskStore>,
    tracker: FailureTracker,
    status_kind: StatusKind,
    throttle: Duration,
}

impl ArchivalStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(
        store: Arc<dyn TaskStore>,
        tracker: FailureTracker,
        status_kind: StatusKind,
        throttle: Duration,
    ) -> Self {
        Self {
            store,
            tracker,
            status_kind,
            throttle,
        }
    }

    /// Archives a batch of completed tasks, routing each by recurrence:
    /// recurring tasks move to the recurring archive to await their due date,
    /// one-shot tasks go straight to the terminal archive.
    pub async fn archive_completed(&self, tasks: Vec<Task>) -> StageReport {
        join_all(tasks.into_iter().map(|task| {
            let destination = Self::destination(&task);
            self.transition(task, destination)
        }))
        .await
        .into_iter()
        .collect()
    }

    /// Moves a batch of tasks into the terminal archive bucket. Used for the
    /// originals of freshly recreated recurring tasks.
    pub async fn archive(&self, tasks: Vec<Task>) -> StageReport {
        join_all(
            tasks
                .into_iter()
                .map(|task| self.transition(task, Bucket::Archive)),
        )
        .await
        .into_iter()
        .collect()
    }

    fn destination(task: &Task) -> Bucket {
        if task.is_recurring() {
            Bucket::RecurringArchive
        } else {
            Bucket::Archive
        }
    }

    async fn transition(&self, mut task: Task, bucket: Bucket) -> Result<Task, TaskFailure> {
        // Archival only ever writes the two archive buckets.
        let label = match bucket {
            Bucket::RecurringArchive => Bucket::RECURRING_ARCHIVE_LABEL,
            _ => Bucket::ARCHIVE_LABEL,
        };
        let properties = single_property(STATUS_PROPERTY, status_value(self.status_kind, label));
        match self.store.update_record(&task.id, properties).await {
            Ok(()) => {
                sleep(self.throttle).await;
                debug!(task = %task.id, bucket = label, "task archived");
                task.status = Some(label.to_string());
                Ok(task)
            }
            Err(error) => {
                warn!(task = %task.id, bucket = label, %error, "archive transition failed");
                self.tracker
                    .record_failure(&task.id, &task.name, FailureKind::ArchiveFailed)
                    .await;
                Err(TaskFailure {
                    id: task.id,
                    name: task.name,
                    kind: Some(FailureKind::ArchiveFailed),
                    detail: error.to_string(),
                })
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

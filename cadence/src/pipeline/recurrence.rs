//! Due-date assignment for freshly completed recurring tasks.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::{next_due, ParsedInterval, Task};
use crate::store::record::{date_value, single_property, DATE_RECURRING_PROPERTY};
use crate::store::TaskStore;

use super::failures::{FailureKind, FailureTracker};
use super::outcome::{StageReport, TaskFailure};

/// Computes and persists the next due date for completed tasks.
///
/// Tasks that already carry a due date (manually set, or computed on an
/// earlier run) pass through untouched: the due date is assigned exactly once
/// per task instance and never recomputed.
pub struct RecurrenceStage {
    store: Arc<dyn TaskStore>,
    tracker: FailureTracker,
    throttle: Duration,
}

impl RecurrenceStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>, tracker: FailureTracker, throttle: Duration) -> Self {
        Self {
            store,
            tracker,
            throttle,
        }
    }

    /// Assigns due dates to a batch of completed tasks.
    ///
    /// All tasks are dispatched concurrently and settle independently; the
    /// report lists which tasks may continue to archival and which dropped
    /// out. Tasks whose spec fails to parse are error-carded and stay in the
    /// completed bucket for the owner to correct.
    pub async fn assign_due_dates(&self, tasks: Vec<Task>) -> StageReport {
        join_all(tasks.into_iter().map(|task| self.assign_one(task)))
            .await
            .into_iter()
            .collect()
    }

    async fn assign_one(&self, mut task: Task) -> Result<Task, TaskFailure> {
        // Set once, never recomputed: an existing due date short-circuits
        // without any remote write.
        if task.date_recurring.is_some() {
            return Ok(task);
        }
        let Some(spec) = task.recurring_spec.clone() else {
            // One-shot task; archival will route it to the terminal bucket.
            return Ok(task);
        };

        let due = match task
            .date_completed
            .ok_or_else(|| "missing completion date".to_string())
            .and_then(|completed| {
                let interval = ParsedInterval::parse(&spec).map_err(|e| e.to_string())?;
                next_due(completed, &interval).map_err(|e| e.to_string())
            }) {
            Ok(due) => due,
            Err(detail) => {
                warn!(task = %task.id, %spec, %detail, "recurring spec rejected");
                self.tracker
                    .record_failure(&task.id, &task.name, FailureKind::InvalidRecurringFormat)
                    .await;
                return Err(TaskFailure {
                    id: task.id,
                    name: task.name,
                    kind: Some(FailureKind::InvalidRecurringFormat),
                    detail,
                });
            }
        };

        let properties = single_property(DATE_RECURRING_PROPERTY, date_value(due));
        match self.store.update_record(&task.id, properties).await {
            Ok(()) => {
                sleep(self.throttle).await;
                debug!(task = %task.id, due = %due, "due date assigned");
                task.date_recurring = Some(due);
                Ok(task)
            }
            Err(error) => {
                // Not carded: none of the card kinds fit a transient write
                // failure, and the next run recomputes from scratch.
                warn!(task = %task.id, %error, "failed to write due date");
                Err(TaskFailure {
                    id: task.id,
                    name: task.name,
                    kind: None,
                    detail: error.to_string(),
                })
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

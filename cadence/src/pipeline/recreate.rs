//! Clones due archived tasks into fresh active ones.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::domain::Task;
use crate::infrastructure::config::TaskSettings;
use crate::store::record::{clone_properties, status_value};
use crate::store::TaskStore;

use super::failures::{FailureKind, FailureTracker};
use super::outcome::{StageReport, TaskFailure};

/// Recreates recurring tasks whose due date has arrived.
///
/// Each due task is cloned from its full property bag minus the configured
/// time-sensitive exclusions, with the status forced to the new-recurring
/// label. The report's successes are the ORIGINALS, which the caller then
/// archives; a failed clone leaves its original in the recurring archive so
/// the next run retries it.
pub struct RecreationStage {
    store: Arc<dyn TaskStore>,
    tracker: FailureTracker,
    settings: TaskSettings,
    throttle: Duration,
}

impl RecreationStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(
        store: Arc<dyn TaskStore>,
        tracker: FailureTracker,
        settings: TaskSettings,
        throttle: Duration,
    ) -> Self {
        Self {
            store,
            tracker,
            settings,
            throttle,
        }
    }

    /// Clones a batch of due tasks concurrently; outcomes settle per task.
    pub async fn recreate(&self, tasks: Vec<Task>) -> StageReport {
        join_all(tasks.into_iter().map(|task| self.recreate_one(task)))
            .await
            .into_iter()
            .collect()
    }

    async fn recreate_one(&self, task: Task) -> Result<Task, TaskFailure> {
        let status = status_value(
            self.settings.status_kind,
            &self.settings.new_recurring_status,
        );
        let properties = clone_properties(&task.raw, &self.settings.clone_exclusions, status);

        match self.store.create_record(properties).await {
            Ok(created) => {
                sleep(self.throttle).await;
                info!(original = %task.id, clone = %created.id, "recurring task recreated");
                Ok(task)
            }
            Err(error) => {
                warn!(task = %task.id, %error, "failed to recreate recurring task");
                self.tracker
                    .record_failure(&task.id, &task.name, FailureKind::RecurCreationFailed)
                    .await;
                Err(TaskFailure {
                    id: task.id,
                    name: task.name,
                    kind: Some(FailureKind::RecurCreationFailed),
                    detail: error.to_string(),
                })
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! The two-pass nightly run.

use core::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::domain::{Bucket, Task};
use crate::infrastructure::config::Settings;
use crate::store::record::map_record;
use crate::store::{StoreError, TaskStore};

use super::archive::ArchivalStage;
use super::failures::{CardSink, FailureTracker};
use super::recreate::RecreationStage;
use super::recurrence::RecurrenceStage;

/// Fatal pipeline errors. Per-task failures never reach this type; only
/// stage-level problems (queries, configuration) abort the run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A bucket query against the remote store failed.
    #[error("remote query failed: {0}")]
    Query(#[from] StoreError),
}

/// Aggregated counters for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Tasks found in the completed bucket.
    pub completed: usize,
    /// Status transitions that succeeded (both archival passes).
    pub archived: usize,
    /// New recurring tasks created.
    pub recurred: usize,
    /// Tasks that failed a stage.
    pub failed: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {} completed task(s): {} archived, {} recurred, {} failed",
            self.completed, self.archived, self.recurred, self.failed
        )
    }
}

/// Sequences the stages of one nightly run and aggregates statistics.
pub struct RunCoordinator {
    store: Arc<dyn TaskStore>,
    recurrence: RecurrenceStage,
    archival: ArchivalStage,
    recreation: RecreationStage,
    completed_status: String,
}

impl RunCoordinator {
    /// Wires the stages over a shared store per the given settings.
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>, settings: &Settings) -> Self {
        let tracker = FailureTracker::new(Arc::new(CardSink::new(store.clone())));
        let throttle = Duration::from_millis(settings.throttle_ms);

        Self {
            recurrence: RecurrenceStage::new(store.clone(), tracker.clone(), throttle),
            archival: ArchivalStage::new(
                store.clone(),
                tracker.clone(),
                settings.tasks.status_kind,
                throttle,
            ),
            recreation: RecreationStage::new(
                store.clone(),
                tracker,
                settings.tasks.clone(),
                throttle,
            ),
            completed_status: settings.tasks.completed_status.clone(),
            store,
        }
    }

    /// Executes one run against today's local date.
    ///
    /// # Errors
    /// Returns `PipelineError` if a bucket query fails; per-task failures are
    /// contained inside the stages and only show up in the summary counters.
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        self.run_on(Local::now().date_naive()).await
    }

    /// Executes one run treating `today` as the current date.
    ///
    /// Due-date eligibility is the only place the current date participates;
    /// it is computed once per run.
    ///
    /// # Errors
    /// Returns `PipelineError` if a bucket query fails.
    pub async fn run_on(&self, today: NaiveDate) -> Result<RunSummary, PipelineError> {
        let mut summary = RunSummary::default();

        self.process_completions(&mut summary).await?;
        self.process_recurrences(today, &mut summary).await?;

        Ok(summary)
    }

    /// Pass 1: assign due dates to newly completed tasks, then archive them.
    ///
    /// Strict sequencing: the recurrence batch fully settles before archival
    /// starts, because archival's input is exactly the recurrence successes.
    async fn process_completions(&self, summary: &mut RunSummary) -> Result<(), PipelineError> {
        let records = self.store.query_by_status(&self.completed_status).await?;
        let tasks: Vec<Task> = records.iter().map(map_record).collect();
        summary.completed = tasks.len();
        info!(count = tasks.len(), "processing completed tasks");

        let dated = self.recurrence.assign_due_dates(tasks).await;
        summary.failed += dated.failed.len();

        let archived = self.archival.archive_completed(dated.succeeded).await;
        summary.archived += archived.succeeded.len();
        summary.failed += archived.failed.len();
        Ok(())
    }

    /// Pass 2: recreate archived recurring tasks whose due date has arrived,
    /// then archive the originals whose clone exists.
    async fn process_recurrences(
        &self,
        today: NaiveDate,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        let records = self
            .store
            .query_by_status(Bucket::RECURRING_ARCHIVE_LABEL)
            .await?;
        let due: Vec<Task> = records
            .iter()
            .map(map_record)
            .filter(|task| task.date_recurring.is_some_and(|date| date <= today))
            .collect();
        info!(due = due.len(), total = records.len(), "processing recurring archive");

        let recreated = self.recreation.recreate(due).await;
        summary.recurred = recreated.succeeded.len();
        summary.failed += recreated.failed.len();

        let archived = self.archival.archive(recreated.succeeded).await;
        summary.archived += archived.succeeded.len();
        summary.failed += archived.failed.len();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_display_reads_naturally() {
        let summary = RunSummary {
            completed: 5,
            archived: 4,
            recurred: 2,
            failed: 1,
        };
        assert_eq!(
            summary.to_string(),
            "processed 5 completed task(s): 4 archived, 2 recurred, 1 failed"
        );
    }

    #[test]
    fn empty_summary_is_all_zero() {
        let summary = RunSummary::default();
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.failed, 0);
    }
}

//! Failure taxonomy and error-card reporting.
//!
//! Per-task failures are surfaced to operators as durable "error cards":
//! records created alongside the tasks in the same database, titled with a
//! deterministic message so they dedup naturally and show up wherever the
//! task board is viewed. Reporting is best-effort: a failure to create the
//! card is logged and swallowed, never allowed to abort the run.

use core::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::RecordId;
use crate::store::record::{single_property, title_value, TITLE_PROPERTY};
use crate::store::{StoreError, TaskStore};

// =============================================================================
// Taxonomy
// =============================================================================

/// The closed set of per-task failure kinds that produce error cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The recurring-interval string does not parse (or cannot be applied).
    /// The task stays completed and unarchived for the owner to fix.
    InvalidRecurringFormat,
    /// Cloning an archived task into a new active task failed. The original
    /// stays in the recurring archive for retry on the next run.
    RecurCreationFailed,
    /// A status-transition update failed. The task stays in its prior bucket
    /// for retry on the next run.
    ArchiveFailed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRecurringFormat => write!(f, "Invalid recurring format"),
            Self::RecurCreationFailed => write!(f, "Recur creation failed"),
            Self::ArchiveFailed => write!(f, "Archive failed"),
        }
    }
}

/// The deterministic error-card message for a failure.
///
/// Identical `(kind, id, name)` tuples always produce the identical message;
/// card dedup keys on this text.
#[must_use]
pub fn failure_message(kind: FailureKind, id: &RecordId, name: &str) -> String {
    format!("{kind}: \"{name}\" ({id})")
}

// =============================================================================
// Error Sink
// =============================================================================

/// Append-only sink for per-task failure reports.
///
/// The production sink stores cards as records in the task database; that is
/// an implementation detail of the remote collaborator, not a property the
/// pipeline relies on.
#[async_trait]
pub trait ErrorSink: Send + Sync {
    /// Records one failure message, deduplicating repeats.
    ///
    /// # Errors
    /// Returns `StoreError` if the sink's backing store fails.
    async fn record(&self, message: &str) -> Result<(), StoreError>;
}

/// Sink that materializes failures as error-card records in the task store.
pub struct CardSink {
    store: Arc<dyn TaskStore>,
}

impl CardSink {
    /// Creates a sink writing cards through the given store.
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ErrorSink for CardSink {
    async fn record(&self, message: &str) -> Result<(), StoreError> {
        // Dedup by message: best effort, not transactionally safe against
        // races. Runs are sequential, so that is acceptable.
        if self.store.find_by_title(message).await?.is_some() {
            return Ok(());
        }
        let properties = single_property(TITLE_PROPERTY, title_value(message));
        let card = self.store.create_record(properties).await?;
        info!(card = %card.id, message, "error card created");
        Ok(())
    }
}

// =============================================================================
// Failure Tracker
// =============================================================================

/// Records per-task failures without ever raising them.
#[derive(Clone)]
pub struct FailureTracker {
    sink: Arc<dyn ErrorSink>,
}

impl FailureTracker {
    /// Creates a tracker over the given sink.
    #[must_use]
    pub fn new(sink: Arc<dyn ErrorSink>) -> Self {
        Self { sink }
    }

    /// Records one task failure. Idempotent per `(kind, id, name)` tuple.
    ///
    /// Sink failures are logged locally and swallowed; error reporting must
    /// never abort the run.
    pub async fn record_failure(&self, id: &RecordId, name: &str, kind: FailureKind) {
        let message = failure_message(kind, id, name);
        if let Err(error) = self.sink.record(&message).await {
            warn!(task = %id, %error, "failed to record error card");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

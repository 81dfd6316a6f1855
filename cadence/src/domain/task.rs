//! Task entity, record identifiers, and lifecycle buckets.

use core::fmt;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::store::record::PropertyBag;

// =============================================================================
// Value Objects
// =============================================================================

/// Opaque stable identifier assigned to a record by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a `RecordId` from the remote store's identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Representation of the remote status field.
///
/// Workspace databases expose the lifecycle field either as a first-class
/// status property or as a plain select property; filters and writes differ
/// between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// First-class status property (`"status"` filter/write shape).
    Status,
    /// Select property (`"select"` filter/write shape).
    Select,
}

// =============================================================================
// Lifecycle Buckets
// =============================================================================

/// The closed set of lifecycle buckets a task can occupy.
///
/// Transitions driven by this system:
/// - `Completed -> Archive` for one-shot tasks,
/// - `Completed -> RecurringArchive` for recurring tasks (due date assigned
///   first when absent),
/// - `RecurringArchive -> NewRecurring` (fresh clone) plus
///   `RecurringArchive -> Archive` (the original) once the due date arrives.
///
/// `Archive` is terminal. `Active -> Completed` happens outside this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Owner-visible working bucket; never written by the batch.
    Active,
    /// Freshly completed tasks awaiting reconciliation. Configured label.
    Completed,
    /// Terminal bucket.
    Archive,
    /// Holding bucket for recurring tasks waiting on their due date.
    RecurringArchive,
    /// Bucket a recreated task starts in. Configured label.
    NewRecurring,
}

impl Bucket {
    /// Board label of the archive bucket.
    pub const ARCHIVE_LABEL: &'static str = "Archive";
    /// Board label of the recurring-archive bucket.
    pub const RECURRING_ARCHIVE_LABEL: &'static str = "Recurring Archive";
}

// =============================================================================
// Task Entity
// =============================================================================

/// A task as seen by one run of the batch.
///
/// Derived from a remote record at query time and owned exclusively by the
/// run that fetched it; the remote store is the sole durable owner of task
/// state between runs.
#[derive(Debug, Clone)]
pub struct Task {
    /// Remote record identifier; immutable once created.
    pub id: RecordId,
    /// Display title; immutable within a run.
    pub name: String,
    /// Free-form recurrence interval string set by the owner, e.g. "1 week".
    pub recurring_spec: Option<String>,
    /// Date the task should become active again. Either supplied manually by
    /// the owner or computed once from `date_completed` + `recurring_spec`;
    /// never recomputed for this task instance.
    pub date_recurring: Option<NaiveDate>,
    /// Date the task entered the completed bucket, set by external
    /// automation; required input to recurrence calculation.
    pub date_completed: Option<NaiveDate>,
    /// Raw status label the record carried when fetched.
    pub status: Option<String>,
    /// Full remote property bag, retained opaquely so a clone can reproduce
    /// every field not explicitly excluded.
    pub raw: PropertyBag,
}

impl Task {
    /// Whether this task participates in recurrence.
    ///
    /// A recurring spec or an already-assigned due date both qualify (the
    /// owner may set a one-time due date by hand without any spec).
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        self.recurring_spec.is_some() || self.date_recurring.is_some()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_task() -> Task {
        Task {
            id: RecordId::new("rec_1"),
            name: "Water plants".to_string(),
            recurring_spec: None,
            date_recurring: None,
            date_completed: None,
            status: None,
            raw: PropertyBag::new(),
        }
    }

    #[test]
    fn record_id_display_is_raw() {
        let id = RecordId::new("abc-123");
        assert_eq!(id.to_string(), "abc-123");
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn one_shot_task_is_not_recurring() {
        assert!(!bare_task().is_recurring());
    }

    #[test]
    fn spec_makes_task_recurring() {
        let mut task = bare_task();
        task.recurring_spec = Some("1 week".to_string());
        assert!(task.is_recurring());
    }

    #[test]
    fn manual_due_date_makes_task_recurring() {
        let mut task = bare_task();
        task.date_recurring = NaiveDate::from_ymd_opt(2024, 3, 8);
        assert!(task.is_recurring());
    }
}

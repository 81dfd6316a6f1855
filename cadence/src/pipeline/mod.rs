//! Pipeline Layer - Stages, Failure Tracking, and Run Coordination
//!
//! Each stage takes a batch of tasks and performs one remote mutation per
//! task. Mutations fan out concurrently and settle independently: one task's
//! failure never cancels or fails its siblings. Stages return a per-task
//! outcome report so downstream stages can exclude failed tasks.
//!
//! Submodules:
//! - `outcome`: per-task outcome and stage report types
//! - `failures`: error taxonomy, error-card sink, failure tracker
//! - `recurrence`: due-date assignment for freshly completed tasks
//! - `archive`: status transitions out of the completed/recurring buckets
//! - `recreate`: cloning due archived tasks into fresh active ones
//! - `coordinator`: the two-pass nightly run

pub use coordinator::{PipelineError, RunCoordinator, RunSummary};
pub use failures::{failure_message, CardSink, ErrorSink, FailureKind, FailureTracker};
pub use outcome::{StageReport, TaskFailure};

/// Status transitions out of lifecycle buckets.
pub mod archive;
/// The two-pass nightly run.
pub mod coordinator;
/// Error taxonomy and error-card reporting.
pub mod failures;
/// Per-task outcome and stage report types.
pub mod outcome;
/// Clones due archived tasks into fresh active ones.
pub mod recreate;
/// Due-date assignment for freshly completed tasks.
pub mod recurrence;

#[cfg(test)]
pub(crate) mod support;

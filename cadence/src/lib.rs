//! Cadence - completion-driven task recurrence for a hosted workspace database.
//!
//! This crate implements a nightly batch job that reconciles task records in a
//! remote workspace database: instead of recurring on a fixed calendar
//! schedule, a task's next occurrence is computed from the date it was
//! actually completed. The pipeline drives tasks through a four-stage
//! lifecycle (Completed -> Archive / Recurring Archive -> New Recurring) with
//! per-task failure isolation so one malformed task never blocks the batch.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Core domain types: tasks, lifecycle buckets, intervals, schedule math.
pub mod domain;
/// Infrastructure components (config, telemetry).
pub mod infrastructure;
/// Pipeline stages, failure tracking, and the run coordinator.
pub mod pipeline;
/// Remote workspace-database capability and record mapping.
pub mod store;

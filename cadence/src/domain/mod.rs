//! Domain Layer - Value Objects and Entities
//!
//! Core domain types for the recurrence pipeline. All types are explicit and
//! self-documenting; invalid states are unrepresentable where practical.
//!
//! Submodules:
//! - `task`: the `Task` entity, `RecordId`, and lifecycle `Bucket`s
//! - `interval`: free-form recurrence-spec parsing
//! - `schedule`: calendar-aware next-due-date arithmetic

pub use interval::{IntervalError, ParsedInterval, Unit};
pub use schedule::next_due;
pub use task::{Bucket, RecordId, StatusKind, Task};

mod interval;
mod schedule;
mod task;

//! Remote workspace-database capability.
//!
//! The hosted database is the sole durable owner of task state between runs.
//! This module defines the capability trait the pipeline consumes
//! ([`TaskStore`]), the raw record/property-bag model and its mapping onto
//! the domain [`Task`](crate::domain::Task), and a reqwest client for a
//! Notion-compatible workspace API.

/// Raw records, property-bag access, and record-to-task mapping.
pub mod record;
/// Capability trait and store error taxonomy.
pub mod traits;
/// Reqwest implementation against a Notion-compatible workspace API.
pub mod workspace;

pub use record::{PropertyBag, RawRecord};
pub use traits::{StoreError, TaskStore};
pub use workspace::{WorkspaceClient, WorkspaceConfig};

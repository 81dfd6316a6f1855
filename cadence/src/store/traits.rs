//! Capability trait for the remote task store.
//!
//! The pipeline never talks to a concrete API; it consumes this trait,
//! enabling unit testing with in-memory implementations and swapping the
//! hosted backend without touching business logic.

use async_trait::async_trait;

use super::record::{PropertyBag, RawRecord};
use crate::domain::RecordId;

/// Errors surfaced by the remote store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Transport-level failure (connect, TLS, timeout).
    #[error("network error: {0}")]
    Network(String),
    /// The remote API rejected the call for exceeding its rate limit.
    #[error("rate limited by the remote store")]
    RateLimited,
    /// Non-success response from the remote API.
    #[error("remote API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, verbatim.
        message: String,
    },
    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// The client could not be constructed from its configuration.
    #[error("client configuration error: {0}")]
    Config(String),
}

/// Contract for task-record access in the remote store.
///
/// Each call is an independent remote transaction; there are no multi-call
/// transactions, so cross-call consistency is the caller's concern.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fetches every record whose status field equals `label`, following
    /// pagination until the result set is exhausted.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails or a page is malformed.
    async fn query_by_status(&self, label: &str) -> Result<Vec<RawRecord>, StoreError>;

    /// Looks up a record whose title equals `title` exactly.
    ///
    /// # Errors
    /// Returns `StoreError` if the lookup fails.
    async fn find_by_title(&self, title: &str) -> Result<Option<RawRecord>, StoreError>;

    /// Creates a new record from a full property bag.
    ///
    /// # Errors
    /// Returns `StoreError` if the creation fails.
    async fn create_record(&self, properties: PropertyBag) -> Result<RawRecord, StoreError>;

    /// Partially updates a record: only the fields present in `properties`
    /// change.
    ///
    /// # Errors
    /// Returns `StoreError` if the update fails.
    async fn update_record(
        &self,
        id: &RecordId,
        properties: PropertyBag,
    ) -> Result<(), StoreError>;
}

//! Reqwest client for a Notion-compatible workspace-database API.
//!
//! One HTTP call per store operation, no in-run retry: a failed task is
//! picked up again by the next nightly run. Sustained request rate is bounded
//! by the pipeline's throttle, not here.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::record::{PropertyBag, RawRecord, TITLE_PROPERTY};
use super::traits::{StoreError, TaskStore};
use crate::domain::{RecordId, StatusKind};

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1/";
/// Default API version header value.
const DEFAULT_API_VERSION: &str = "2022-06-28";
/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the workspace client.
pub struct WorkspaceConfig {
    /// Bearer token for the integration.
    pub token: SecretString,
    /// Database (task container) identifier all queries are scoped to.
    pub database_id: String,
    /// Shape of the lifecycle status field, used in filters.
    pub status_kind: StatusKind,
    /// API base URL.
    pub base_url: Url,
    /// API version header value.
    pub api_version: Option<String>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

impl WorkspaceConfig {
    /// Creates a config with the default base URL.
    #[must_use]
    pub fn new(token: SecretString, database_id: impl Into<String>, status_kind: StatusKind) -> Self {
        Self {
            token,
            database_id: database_id.into(),
            status_kind,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default base URL"),
            api_version: None,
            timeout: None,
        }
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the API version header value.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Deserialize)]
struct QueryResponse {
    results: Vec<RawRecord>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Client implementation of [`TaskStore`] over HTTP.
pub struct WorkspaceClient {
    client: Client,
    config: WorkspaceConfig,
    api_version: String,
}

impl WorkspaceClient {
    /// Builds the client.
    ///
    /// # Errors
    /// Returns `StoreError::Config` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: WorkspaceConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;
        let api_version = config
            .api_version
            .clone()
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        Ok(Self {
            client,
            config,
            api_version,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| StoreError::Config(format!("invalid URL join: {e}")))
    }

    /// Equality filter on the status field, shaped per the configured kind.
    fn status_filter(kind: StatusKind, label: &str) -> Value {
        match kind {
            StatusKind::Status => json!({
                "property": super::record::STATUS_PROPERTY,
                "status": { "equals": label },
            }),
            StatusKind::Select => json!({
                "property": super::record::STATUS_PROPERTY,
                "select": { "equals": label },
            }),
        }
    }

    /// Exact-match filter on the title property.
    fn title_filter(title: &str) -> Value {
        json!({
            "property": TITLE_PROPERTY,
            "title": { "equals": title },
        })
    }

    async fn post_json(&self, url: Url, body: &Value) -> Result<Response, StoreError> {
        let res = self
            .client
            .post(url)
            .bearer_auth(self.config.token.expose_secret())
            .header("Notion-Version", &self.api_version)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::check_status(res).await
    }

    async fn patch_json(&self, url: Url, body: &Value) -> Result<Response, StoreError> {
        let res = self
            .client
            .patch(url)
            .bearer_auth(self.config.token.expose_secret())
            .header("Notion-Version", &self.api_version)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::check_status(res).await
    }

    async fn check_status(res: Response) -> Result<Response, StoreError> {
        match res.status() {
            status if status.is_success() => Ok(res),
            StatusCode::TOO_MANY_REQUESTS => Err(StoreError::RateLimited),
            status => {
                let message = res.text().await.unwrap_or_default();
                Err(StoreError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Runs a database query with the given filter, following pagination.
    async fn query(&self, filter: Value) -> Result<Vec<RawRecord>, StoreError> {
        let url = self.endpoint(&format!("databases/{}/query", self.config.database_id))?;
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "filter": filter });
            if let Some(ref cursor) = cursor {
                body["start_cursor"] = json!(cursor);
            }

            let page: QueryResponse = self
                .post_json(url.clone(), &body)
                .await?
                .json()
                .await
                .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;

            records.extend(page.results);
            if page.has_more {
                cursor = page.next_cursor;
                if cursor.is_none() {
                    // The API claims more pages but gave no cursor; stop
                    // rather than loop forever.
                    break;
                }
            } else {
                break;
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl TaskStore for WorkspaceClient {
    async fn query_by_status(&self, label: &str) -> Result<Vec<RawRecord>, StoreError> {
        let filter = Self::status_filter(self.config.status_kind, label);
        let records = self.query(filter).await?;
        debug!(label, count = records.len(), "status query complete");
        Ok(records)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<RawRecord>, StoreError> {
        let records = self.query(Self::title_filter(title)).await?;
        Ok(records.into_iter().next())
    }

    async fn create_record(&self, properties: PropertyBag) -> Result<RawRecord, StoreError> {
        let url = self.endpoint("pages")?;
        let body = json!({
            "parent": { "database_id": self.config.database_id },
            "properties": properties,
        });
        self.post_json(url, &body)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))
    }

    async fn update_record(
        &self,
        id: &RecordId,
        properties: PropertyBag,
    ) -> Result<(), StoreError> {
        let url = self.endpoint(&format!("pages/{}", id.as_str()))?;
        let body = json!({ "properties": properties });
        self.patch_json(url, &body).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Process configuration.
//!
//! Loaded once at startup from the environment (prefix `CADENCE`, segments
//! separated by `__`, e.g. `CADENCE_API__TOKEN`, `CADENCE_TASKS__STATUS_KIND`)
//! and passed by reference into every component that needs it. There is no
//! ambient global.

use config::{Config, ConfigError, Environment};
use secrecy::SecretString;
use serde::Deserialize;

use crate::domain::StatusKind;

/// Top-level settings for one batch run.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Remote workspace API settings.
    pub api: ApiSettings,
    /// Task-board semantics: labels, status-field kind, clone exclusions.
    #[serde(default)]
    pub tasks: TaskSettings,
    /// Pause after each successful remote mutation, in milliseconds. Bounds
    /// the sustained request rate against the remote API's documented limit.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

/// Remote workspace API settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    /// Integration token.
    pub token: SecretString,
    /// Database (task container) identifier.
    pub database_id: String,
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API version header value.
    #[serde(default = "default_api_version")]
    pub version: String,
    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Task-board semantics.
#[derive(Debug, Deserialize, Clone)]
pub struct TaskSettings {
    /// Label of the completed bucket.
    #[serde(default = "default_completed_status")]
    pub completed_status: String,
    /// Label a recreated task starts in.
    #[serde(default = "default_new_recurring_status")]
    pub new_recurring_status: String,
    /// Shape of the status field on the remote database.
    #[serde(default = "default_status_kind")]
    pub status_kind: StatusKind,
    /// Time-sensitive fields stripped when cloning a task for recreation.
    #[serde(default = "default_clone_exclusions")]
    pub clone_exclusions: Vec<String>,
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self {
            completed_status: default_completed_status(),
            new_recurring_status: default_new_recurring_status(),
            status_kind: default_status_kind(),
            clone_exclusions: default_clone_exclusions(),
        }
    }
}

fn default_throttle_ms() -> u64 {
    // Keeps the sustained rate inside the remote API's ~3 req/s limit.
    334
}

fn default_base_url() -> String {
    "https://api.notion.com/v1/".to_string()
}

fn default_api_version() -> String {
    "2022-06-28".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_completed_status() -> String {
    "Done".to_string()
}

fn default_new_recurring_status() -> String {
    "To Do".to_string()
}

fn default_status_kind() -> StatusKind {
    StatusKind::Status
}

fn default_clone_exclusions() -> Vec<String> {
    ["Date Created", "Date Completed", "Date Recurring"]
        .map(String::from)
        .to_vec()
}

impl Settings {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if required values (token, database id) are
    /// missing or any value fails to deserialize.
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(
                Environment::with_prefix("CADENCE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("tasks.clone_exclusions")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_defaults_match_board_conventions() {
        let tasks = TaskSettings::default();
        assert_eq!(tasks.completed_status, "Done");
        assert_eq!(tasks.new_recurring_status, "To Do");
        assert_eq!(tasks.status_kind, StatusKind::Status);
        assert_eq!(
            tasks.clone_exclusions,
            vec!["Date Created", "Date Completed", "Date Recurring"]
        );
    }

    #[test]
    fn throttle_default_is_rate_limit_friendly() {
        assert_eq!(default_throttle_ms(), 334);
    }

    #[test]
    fn full_settings_deserialize_with_defaults() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "api": { "token": "secret-token", "database_id": "db_1" },
        }))
        .unwrap();
        assert_eq!(settings.api.base_url, "https://api.notion.com/v1/");
        assert_eq!(settings.api.version, "2022-06-28");
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.throttle_ms, 334);
        assert_eq!(settings.tasks.completed_status, "Done");
    }

    #[test]
    fn status_kind_parses_lowercase() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "api": { "token": "t", "database_id": "d" },
            "tasks": { "status_kind": "select" },
        }))
        .unwrap();
        assert_eq!(settings.tasks.status_kind, StatusKind::Select);
    }
}

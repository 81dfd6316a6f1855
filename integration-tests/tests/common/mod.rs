//! Shared fixtures for pipeline integration tests: an in-memory task store
//! and record builders mirroring the remote workspace's property shapes.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cadence::domain::RecordId;
use cadence::infrastructure::config::{ApiSettings, Settings, TaskSettings};
use cadence::store::{PropertyBag, RawRecord, StoreError, TaskStore};
use secrecy::SecretString;
use serde_json::{json, Value};

/// In-memory `TaskStore` with scriptable per-record failures.
///
/// Updates merge into the stored records so the second pipeline pass (and a
/// second run) observes the first one's transitions, like the remote store.
#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<Vec<RawRecord>>,
    pub created: Mutex<Vec<PropertyBag>>,
    fail_updates: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn seeded(records: Vec<RawRecord>) -> Arc<Self> {
        let store = Self::default();
        *store.records.lock().unwrap() = records;
        Arc::new(store)
    }

    /// Makes every update to the given record id fail.
    pub fn fail_update(&self, id: &str) {
        self.fail_updates.lock().unwrap().insert(id.to_string());
    }

    /// Current status label of a stored record.
    pub fn status_of(&self, id: &str) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .and_then(|r| status_label(&r.properties).map(str::to_string))
    }

    /// Titles of all stored records.
    pub fn titles(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| title_text(&r.properties))
            .collect()
    }
}

fn title_text(properties: &PropertyBag) -> Option<String> {
    let segments = properties.get("Name")?.get("title")?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|s| {
            s.get("plain_text")
                .and_then(Value::as_str)
                .or_else(|| s.get("text").and_then(|t| t.get("content")).and_then(Value::as_str))
        })
        .collect();
    Some(text)
}

fn status_label(properties: &PropertyBag) -> Option<&str> {
    let value = properties.get("Status")?;
    for shape in ["status", "select"] {
        if let Some(name) = value.get(shape).and_then(|v| v.get("name")).and_then(Value::as_str) {
            return Some(name);
        }
    }
    None
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn query_by_status(&self, label: &str) -> Result<Vec<RawRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| status_label(&r.properties) == Some(label))
            .cloned()
            .collect())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<RawRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| title_text(&r.properties).as_deref() == Some(title))
            .cloned())
    }

    async fn create_record(&self, properties: PropertyBag) -> Result<RawRecord, StoreError> {
        self.created.lock().unwrap().push(properties.clone());
        let mut records = self.records.lock().unwrap();
        let record = RawRecord {
            id: format!("gen_{}", records.len() + 1),
            properties,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        id: &RecordId,
        properties: PropertyBag,
    ) -> Result<(), StoreError> {
        if self.fail_updates.lock().unwrap().contains(id.as_str()) {
            return Err(StoreError::Api {
                status: 500,
                message: "update rejected".to_string(),
            });
        }
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.id == id.as_str()) {
            for (key, value) in properties {
                record.properties.insert(key, value);
            }
        }
        Ok(())
    }
}

/// Settings fixture: default board semantics, zero throttle.
pub fn settings() -> Settings {
    Settings {
        api: ApiSettings {
            token: SecretString::new("test-token".into()),
            database_id: "db_test".to_string(),
            base_url: "https://api.notion.com/v1/".to_string(),
            version: "2022-06-28".to_string(),
            timeout_secs: 30,
        },
        tasks: TaskSettings::default(),
        throttle_ms: 0,
    }
}

/// A task record in the given bucket, optionally recurring.
pub fn task_record(
    id: &str,
    name: &str,
    status: &str,
    recurring_spec: Option<&str>,
    date_completed: Option<&str>,
    date_recurring: Option<&str>,
) -> RawRecord {
    let mut properties = json!({
        "Name": { "title": [{ "plain_text": name }] },
        "Status": { "status": { "name": status } },
        "Date Created": { "created_time": "2024-01-01T00:00:00.000Z" },
    })
    .as_object()
    .unwrap()
    .clone();

    if let Some(spec) = recurring_spec {
        properties.insert(
            "Recurring".to_string(),
            json!({ "rich_text": [{ "plain_text": spec }] }),
        );
    }
    if let Some(date) = date_completed {
        properties.insert(
            "Date Completed".to_string(),
            json!({ "date": { "start": date } }),
        );
    }
    if let Some(date) = date_recurring {
        properties.insert(
            "Date Recurring".to_string(),
            json!({ "date": { "start": date } }),
        );
    }

    RawRecord {
        id: id.to_string(),
        properties,
    }
}

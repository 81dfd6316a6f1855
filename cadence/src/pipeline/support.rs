//! In-memory test doubles shared by the pipeline unit tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{RecordId, Task};
use crate::store::record::{PropertyBag, STATUS_PROPERTY, TITLE_PROPERTY};
use crate::store::{RawRecord, StoreError, TaskStore};

use super::failures::ErrorSink;

/// A bare task for fixtures.
pub fn task_named(id: &str, name: &str) -> Task {
    Task {
        id: RecordId::new(id),
        name: name.to_string(),
        recurring_spec: None,
        date_recurring: None,
        date_completed: None,
        status: None,
        raw: PropertyBag::new(),
    }
}

/// Sink that drops every message.
#[derive(Default)]
pub struct NullSink;

#[async_trait]
impl ErrorSink for NullSink {
    async fn record(&self, _message: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Sink that remembers every message it accepts.
#[derive(Default)]
pub struct RecordingSink {
    pub messages: Mutex<Vec<String>>,
}

#[async_trait]
impl ErrorSink for RecordingSink {
    async fn record(&self, message: &str) -> Result<(), StoreError> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// In-memory `TaskStore` with scriptable per-record failures.
///
/// Updates merge into the stored records so a later query within the same
/// test observes earlier transitions, mirroring the remote store.
#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<Vec<RawRecord>>,
    pub updates: Mutex<Vec<(String, PropertyBag)>>,
    pub created: Mutex<Vec<PropertyBag>>,
    fail_updates: Mutex<HashSet<String>>,
    fail_creates: Mutex<bool>,
}

impl MemoryStore {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seeded(records: Vec<RawRecord>) -> Arc<Self> {
        let store = Self::default();
        *store.records.lock().unwrap() = records;
        Arc::new(store)
    }

    /// Makes every update to the given record id fail.
    pub fn fail_update(&self, id: &str) {
        self.fail_updates.lock().unwrap().insert(id.to_string());
    }

    /// Makes every create fail.
    pub fn fail_creates(&self) {
        *self.fail_creates.lock().unwrap() = true;
    }

    fn title_of(properties: &PropertyBag) -> Option<String> {
        let segments = properties.get(TITLE_PROPERTY)?.get("title")?.as_array()?;
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

    fn status_of(properties: &PropertyBag) -> Option<&str> {
        let value = properties.get(STATUS_PROPERTY)?;
        for shape in ["status", "select"] {
            if let Some(name) = value.get(shape).and_then(|v| v.get("name")).and_then(Value::as_str)
            {
                return Some(name);
            }
        }
        None
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn query_by_status(&self, label: &str) -> Result<Vec<RawRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| Self::status_of(&r.properties) == Some(label))
            .cloned()
            .collect())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<RawRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| Self::title_of(&r.properties).as_deref() == Some(title))
            .cloned())
    }

    async fn create_record(&self, properties: PropertyBag) -> Result<RawRecord, StoreError> {
        if *self.fail_creates.lock().unwrap() {
            return Err(StoreError::Api {
                status: 500,
                message: "create rejected".to_string(),
            });
        }
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
        self.updates
            .lock()
            .unwrap()
            .push((id.as_str().to_string(), properties.clone()));
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.id == id.as_str()) {
            for (key, value) in properties {
                record.properties.insert(key, value);
            }
        }
        Ok(())
    }
}

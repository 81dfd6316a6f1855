//! Raw records, property-bag access, and record-to-task mapping.
//!
//! The remote schema is operator-defined and open-ended, so records are
//! modelled as an ordered mapping from field name to opaque JSON value, never
//! as a typed struct. Cloning a record for recreation is copy-then-delete by
//! key set over that mapping.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::domain::{RecordId, StatusKind, Task};

// =============================================================================
// Field Names
// =============================================================================

/// Title property of a task record.
pub const TITLE_PROPERTY: &str = "Name";
/// Lifecycle status property.
pub const STATUS_PROPERTY: &str = "Status";
/// Free-form recurring-spec property.
pub const RECURRING_PROPERTY: &str = "Recurring";
/// Computed or manually set next-due date.
pub const DATE_RECURRING_PROPERTY: &str = "Date Recurring";
/// Completion date, written by external automation.
pub const DATE_COMPLETED_PROPERTY: &str = "Date Completed";

// =============================================================================
// Raw Records
// =============================================================================

/// Ordered field-name to opaque-value mapping of a remote record.
///
/// Field order is preserved so a cloned record keeps the operator's layout.
pub type PropertyBag = serde_json::Map<String, Value>;

/// A record as returned by the remote store, before domain mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    /// Remote record identifier.
    pub id: String,
    /// Full property bag, kept opaque.
    #[serde(default)]
    pub properties: PropertyBag,
}

// =============================================================================
// Property Readers
// =============================================================================

/// Concatenated plain text of a `title` or `rich_text` property segment list.
fn segments_text(value: &Value, segment_key: &str) -> Option<String> {
    let segments = value.get(segment_key)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|s| s.get("plain_text").and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Reads a date property as a date-only value.
///
/// Remote date values may carry a time component; only the leading
/// `YYYY-MM-DD` participates, comparisons never see a time of day.
fn date_text(value: &Value) -> Option<&str> {
    let start = value.get("date")?.get("start")?.as_str()?;
    start.get(..10)
}

/// Reads the status label from either the `status` or `select` shape.
///
/// Reading accepts both shapes regardless of the configured kind; writes and
/// filters follow the configuration.
fn status_text(value: &Value) -> Option<&str> {
    for shape in ["status", "select"] {
        if let Some(name) = value.get(shape).and_then(|v| v.get("name")).and_then(Value::as_str) {
            return Some(name);
        }
    }
    None
}

// =============================================================================
// Property Writers
// =============================================================================

/// Builds a write-side title property value.
#[must_use]
pub fn title_value(text: &str) -> Value {
    json!({ "title": [{ "text": { "content": text } }] })
}

/// Builds a write-side date property value (date only, no time component).
#[must_use]
pub fn date_value(date: NaiveDate) -> Value {
    json!({ "date": { "start": date.format("%Y-%m-%d").to_string() } })
}

/// Builds a write-side status property value in the configured shape.
#[must_use]
pub fn status_value(kind: StatusKind, label: &str) -> Value {
    match kind {
        StatusKind::Status => json!({ "status": { "name": label } }),
        StatusKind::Select => json!({ "select": { "name": label } }),
    }
}

/// A property bag containing a single field.
#[must_use]
pub fn single_property(name: &str, value: Value) -> PropertyBag {
    let mut bag = PropertyBag::new();
    bag.insert(name.to_string(), value);
    bag
}

// =============================================================================
// Record -> Task Mapping
// =============================================================================

/// Normalizes a raw remote record into the internal task entity.
///
/// Mapping is tolerant: a malformed optional field becomes `None` with a
/// warning rather than an error, so one bad record never stops the batch.
#[must_use]
pub fn map_record(record: &RawRecord) -> Task {
    let props = &record.properties;
    let id = RecordId::new(record.id.clone());

    let name = props
        .get(TITLE_PROPERTY)
        .and_then(|v| segments_text(v, "title"))
        .unwrap_or_else(|| "Untitled".to_string());

    let recurring_spec = props
        .get(RECURRING_PROPERTY)
        .and_then(|v| segments_text(v, "rich_text"));

    let date_recurring = read_date(props.get(DATE_RECURRING_PROPERTY), &id, DATE_RECURRING_PROPERTY);
    let date_completed = read_date(props.get(DATE_COMPLETED_PROPERTY), &id, DATE_COMPLETED_PROPERTY);

    let status = props
        .get(STATUS_PROPERTY)
        .and_then(status_text)
        .map(ToString::to_string);

    Task {
        id,
        name,
        recurring_spec,
        date_recurring,
        date_completed,
        status,
        raw: props.clone(),
    }
}

fn read_date(value: Option<&Value>, id: &RecordId, field: &str) -> Option<NaiveDate> {
    let text = value.and_then(date_text)?;
    match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(record = %id, field, value = text, "unparseable date value, treating as unset");
            None
        }
    }
}

// =============================================================================
// Clone Builder
// =============================================================================

/// Builds the property bag for a recreated task.
///
/// Copies the original bag, removes the excluded time-sensitive fields by
/// name, and forces the status property to the given value.
#[must_use]
pub fn clone_properties(
    raw: &PropertyBag,
    exclusions: &[String],
    status: Value,
) -> PropertyBag {
    let mut bag = raw.clone();
    for field in exclusions {
        bag.remove(field);
    }
    bag.insert(STATUS_PROPERTY.to_string(), status);
    bag
}

// =============================================================================
// Unit Tests
// =============================================================================

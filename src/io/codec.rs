//! Persisted format: a JSON array of task records, in task order.
//!
//! ```json
//! [
//!   { "id": 1, "text": "Buy milk", "dueDate": null, "completed": false },
//!   { "id": 2, "text": "Call bank", "dueDate": "2024-01-01", "completed": true }
//! ]
//! ```
//!
//! Decoding is lenient per record: missing fields take defaults, bad dates
//! become "no date", and a record that cannot be read at all is skipped
//! instead of failing the whole list.

use std::collections::HashSet;

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::task::{Task, TaskId};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The persisted bytes are not a task list at all
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("stored tasks are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored tasks are not a list")]
    NotAList,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_id"
    )]
    id: Option<u64>,
    #[serde(default)]
    text: String,
    #[serde(
        default,
        serialize_with = "serialize_date",
        deserialize_with = "deserialize_date"
    )]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    completed: bool,
}

fn serialize_date<S>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match date {
        Some(d) => s.serialize_str(&d.format(DATE_FORMAT).to_string()),
        None => s.serialize_none(),
    }
}

/// Anything but a whole number in `1..=TaskId::MAX_STORED` means "no id";
/// the record is kept and gets a fresh one.
fn deserialize_id<'de, D>(d: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(d)?;
    Ok(value
        .as_u64()
        .filter(|&id| (1..=TaskId::MAX_STORED).contains(&id)))
}

/// `null`, `""`, non-strings and unparsable strings all mean "no date".
fn deserialize_date<'de, D>(d: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(d)?;
    Ok(value.as_str().and_then(parse_date))
}

/// Parse a calendar date. Accepts `YYYY-MM-DD` (signed years included),
/// optionally followed by a `T` or space and a time part, which is ignored.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok().or_else(|| {
        let (day, _time) = s.split_once(['T', ' '])?;
        NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
    })
}

/// Serialize the collection in order
pub fn encode(tasks: &[Task]) -> Result<Vec<u8>, serde_json::Error> {
    let records: Vec<TaskRecord> = tasks
        .iter()
        .map(|t| TaskRecord {
            id: Some(t.id.0),
            text: t.text.clone(),
            due_date: t.due_date,
            completed: t.completed,
        })
        .collect();
    serde_json::to_vec_pretty(&records)
}

/// Rebuild the collection from persisted bytes.
///
/// Records with missing, zero or duplicate ids get fresh ids after all
/// persisted ids are known, so no id is ever handed out twice.
pub fn decode(bytes: &[u8]) -> Result<Vec<Task>, DecodeError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        _ => return Err(DecodeError::NotAList),
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<TaskRecord>(item) {
            Ok(record) if record.text.trim().is_empty() => {
                warn!("skipping stored task #{} with empty text", index);
            }
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping unreadable stored task #{}: {}", index, e),
        }
    }

    let mut seen = HashSet::new();
    let mut ids: Vec<Option<u64>> = records
        .iter()
        .map(|r| r.id.filter(|&id| id != 0 && seen.insert(id)))
        .collect();
    // Stored ids are capped at MAX_STORED, so this cannot overflow
    let mut next = seen.iter().copied().max().unwrap_or(0).saturating_add(1);
    for id in ids.iter_mut().filter(|id| id.is_none()) {
        *id = Some(next);
        next = next.saturating_add(1);
    }

    Ok(records
        .into_iter()
        .zip(ids)
        .map(|(record, id)| Task {
            id: TaskId(id.unwrap_or_default()),
            text: record.text.trim().to_string(),
            due_date: record.due_date,
            completed: record.completed,
        })
        .collect())
}

//! Performance Result Model
//!
//! Wire shape of a client submission and of one line in the results log.
//! Field names are camelCase on the wire; log lines may only ever gain fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single key/value attribute of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute key, scoped within its event
    pub name: String,
    pub value: String,
}

/// An analytics event with its attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_name: String,
    /// Older log lines store `null` here
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Vec<Attribute>,
}

/// Results of one performance test run, as submitted by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResult {
    /// Not part of the payload schema; `null` reads as empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub build_info: String,
    /// `<userHash>-<YYYY.MM.DD-HH.MM.SS>`
    pub session_id: String,
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<Event>,
}

impl PerformanceResult {
    /// Iterate `(eventName.attributeName, value)` pairs in submission order
    pub fn column_values(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        self.events.iter().flat_map(|event| {
            event.attributes.iter().map(move |attr| {
                (
                    column_key(&event.event_name, &attr.name),
                    attr.value.as_str(),
                )
            })
        })
    }
}

/// Server-side data attached to a result when it is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Receipt time (UTC)
    #[serde(rename = "datetime")]
    pub date_time: DateTime<Utc>,
    /// Source address as observed by the server
    pub ip: String,
}

/// One line of the results log: metadata and result flattened into one object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(flatten)]
    pub metadata: Metadata,
    #[serde(flatten)]
    pub result: PerformanceResult,
}

/// Borrowed form of [`LogRecord`] for the write path
#[derive(Debug, Serialize)]
pub struct LogRecordRef<'a> {
    #[serde(flatten)]
    pub metadata: &'a Metadata,
    #[serde(flatten)]
    pub result: &'a PerformanceResult,
}

/// Column key used to flatten event attributes into a table
pub fn column_key(event_name: &str, attribute_name: &str) -> String {
    format!("{event_name}.{attribute_name}")
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

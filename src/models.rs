//! Schedule Models
//!
//! Events and per-date records, in the shape they are persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier shared by every per-date copy of one event
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh id derived from a millisecond timestamp (`e<millis>`)
    pub fn from_timestamp(millis: u64) -> Self {
        Self(format!("e{}", millis))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One copy of an event, stored under each date it spans
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Event {
    /// Line shown in the event list: `time — title`, or just the title
    pub fn heading(&self) -> String {
        match &self.time {
            Some(time) => format!("{} — {}", time, self.title),
            None => self.title.clone(),
        }
    }
}

/// Events and notes attached to one date
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DateRecord {
    pub items: Vec<Event>,
    pub notes: String,
}

impl DateRecord {
    /// No events and only whitespace notes
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.notes.trim().is_empty()
    }
}

//! Normalized calendar events.
//!
//! An [`Event`] is what a calendar view renders: one entry in one day's
//! bucket of the [`CalendarIndex`](crate::CalendarIndex).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::time::DateKey;

/// Opaque, source-specific event fields (assignment id, class id, ...).
pub type Metadata = Map<String, Value>;

/// Metadata key flagging placeholder events produced by the fallback policy.
pub const SYNTHETIC_KEY: &str = "synthetic";

/// The source an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// A public holiday.
    Holiday,
    /// A scheduled class day in the active term.
    ClassDay,
    /// An assignment or quiz due date.
    Assignment,
    /// Any other school event.
    GenericEvent,
}

impl EventKind {
    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Holiday => "holiday",
            Self::ClassDay => "classDay",
            Self::Assignment => "assignment",
            Self::GenericEvent => "genericEvent",
        }
    }

    /// Returns a short label for list rendering.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Holiday => "Holiday",
            Self::ClassDay => "Class",
            Self::Assignment => "Due",
            Self::GenericEvent => "Event",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized event stored in a day bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    date_key: DateKey,
    /// The source this event came from.
    pub kind: EventKind,
    /// Display title.
    pub title: String,
    /// Display color (`#RRGGBB`).
    pub color: String,
    /// Optional display time, e.g. `9:00 AM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Optional display status, e.g. `Scheduled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Source-specific fields.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Metadata,
}

impl Event {
    /// Creates an event on the given day.
    pub fn new(
        date_key: DateKey,
        kind: EventKind,
        title: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            date_key,
            kind,
            title: title.into(),
            color: color.into(),
            time: None,
            status: None,
            metadata: Metadata::new(),
        }
    }

    /// The day this event belongs to.
    pub fn date_key(&self) -> DateKey {
        self.date_key
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Adds one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Replaces the metadata map.
    pub fn with_metadata_map(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns true for placeholder events that carry no real data.
    pub fn is_synthetic(&self) -> bool {
        self.metadata
            .get(SYNTHETIC_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

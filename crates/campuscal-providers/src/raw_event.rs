//! Raw event type produced by source adapters.
//!
//! A [`RawEvent`] is a record as a source reported it, mapped into a common
//! shape but with its date still in the source's own representation. The
//! aggregator turns it into an [`Event`](campuscal_core::Event) via
//! [`to_event`](crate::normalize::to_event).

use campuscal_core::{DateLike, EventKind, Metadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Color of public holidays.
pub const HOLIDAY_COLOR: &str = "#FFEB3B";
/// Color of class days.
pub const CLASS_DAY_COLOR: &str = "#4CAF50";
/// Default color of assignments.
pub const ASSIGNMENT_COLOR: &str = "#FF5722";
/// Default color of quizzes.
pub const QUIZ_COLOR: &str = "#9C27B0";
/// Default color of generic school events.
pub const EVENT_COLOR: &str = "#2196F3";

/// The kind of source a raw event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    Holiday,
    ClassDay,
    Assignment,
    GenericEvent,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        self.event_kind().as_str()
    }

    /// The event kind events from this source are stored under.
    pub fn event_kind(&self) -> EventKind {
        match self {
            Self::Holiday => EventKind::Holiday,
            Self::ClassDay => EventKind::ClassDay,
            Self::Assignment => EventKind::Assignment,
            Self::GenericEvent => EventKind::GenericEvent,
        }
    }

    /// Color used when a record carries no color hint.
    pub fn default_color(&self) -> &'static str {
        match self {
            Self::Holiday => HOLIDAY_COLOR,
            Self::ClassDay => CLASS_DAY_COLOR,
            Self::Assignment => ASSIGNMENT_COLOR,
            Self::GenericEvent => EVENT_COLOR,
        }
    }
}

impl From<SourceKind> for EventKind {
    fn from(kind: SourceKind) -> Self {
        kind.event_kind()
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source record before date normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub source_kind: SourceKind,
    /// The date as the source reported it.
    pub raw_date: DateLike,
    pub title: String,
    /// Source-suggested color.
    #[serde(default)]
    pub color_hint: Option<String>,
    /// Display time, if the source provides one.
    #[serde(default)]
    pub time: Option<String>,
    /// Display status, if the source provides one.
    #[serde(default)]
    pub status: Option<String>,
    /// Source-specific fields carried through to the event.
    #[serde(default)]
    pub metadata: Metadata,
}

impl RawEvent {
    pub fn new(source_kind: SourceKind, raw_date: impl Into<DateLike>, title: impl Into<String>) -> Self {
        Self {
            source_kind,
            raw_date: raw_date.into(),
            title: title.into(),
            color_hint: None,
            time: None,
            status: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color_hint = Some(color.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The color to display: the hint if present, the source default otherwise.
    pub fn effective_color(&self) -> &str {
        match self.color_hint.as_deref() {
            Some(color) if !color.trim().is_empty() => color,
            _ => self.source_kind.default_color(),
        }
    }
}

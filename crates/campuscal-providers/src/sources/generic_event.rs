//! School events.

use campuscal_core::DateLike;
use serde::Deserialize;

use crate::adapter::{BoxFuture, SourceAdapter};
use crate::error::ProviderResult;
use crate::http::ApiClient;
use crate::raw_event::{EVENT_COLOR, RawEvent, SourceKind};
use crate::sources::{decode_records, non_blank};

const DEFAULT_PATH: &str = "/events";
const DEFAULT_TITLE: &str = "Event";
const DEFAULT_TYPE: &str = "event";

#[derive(Debug, Deserialize)]
struct EventRecord {
    date: DateLike,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default, rename = "type")]
    event_type: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

fn map_event(record: EventRecord) -> Option<RawEvent> {
    let title = non_blank(record.title)
        .or_else(|| non_blank(record.name))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let color = non_blank(record.color).unwrap_or_else(|| EVENT_COLOR.to_string());
    let event_type = non_blank(record.event_type).unwrap_or_else(|| DEFAULT_TYPE.to_string());

    let mut raw = RawEvent::new(SourceKind::GenericEvent, record.date, title)
        .with_color(color)
        .with_metadata("type", event_type);
    if let Some(time) = non_blank(record.time) {
        raw = raw.with_time(time);
    }
    if let Some(status) = non_blank(record.status) {
        raw = raw.with_status(status);
    }
    Some(raw)
}

/// Fetches arbitrary school events.
#[derive(Debug, Clone)]
pub struct GenericEventAdapter {
    client: ApiClient,
    path: String,
}

impl GenericEventAdapter {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            path: DEFAULT_PATH.to_string(),
        }
    }

    /// Overrides the endpoint path (default `/events`).
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

impl SourceAdapter for GenericEventAdapter {
    fn name(&self) -> &str {
        "events"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::GenericEvent
    }

    fn fetch_raw(&self) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>> {
        Box::pin(async move {
            let records = self.client.get_records(&self.path).await?;
            Ok(decode_records(self.name(), records, map_event))
        })
    }
}

//! Assignment and quiz due dates.
//!
//! Assignments carry their due date under `dueDate`, quizzes under
//! `timing.close`. Either key is accepted on any record, and a blank or
//! unparseable `dueDate` falls back to `timing.close`. Records with neither
//! are dropped.

use campuscal_core::{DateLike, normalize};
use chrono::Local;
use serde::Deserialize;
use serde_json::Value;

use crate::adapter::{BoxFuture, SourceAdapter};
use crate::error::ProviderResult;
use crate::http::ApiClient;
use crate::raw_event::{ASSIGNMENT_COLOR, QUIZ_COLOR, RawEvent, SourceKind};
use crate::sources::{decode_records, non_blank};

const DEFAULT_PATH: &str = "/assignments";

#[derive(Debug, Default, Deserialize)]
struct Timing {
    #[serde(default)]
    close: Option<DateLike>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentRecord {
    #[serde(default)]
    due_date: Option<DateLike>,
    #[serde(default)]
    timing: Option<Timing>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "type")]
    record_type: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    end: Option<DateLike>,
    #[serde(default)]
    assignment_id: Option<Value>,
    #[serde(default, rename = "_id")]
    object_id: Option<Value>,
    #[serde(default)]
    class_id: Option<Value>,
    #[serde(default, rename = "classID")]
    class_id_upper: Option<Value>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
}

fn map_assignment(record: AssignmentRecord) -> Option<RawEvent> {
    let quiz_close = record.timing.and_then(|t| t.close);
    // An unusable `dueDate` yields to `timing.close` when that one is present.
    let (due, from_timing) = match (record.due_date, quiz_close) {
        (Some(due), _) if normalize(&due).is_ok() => (due, false),
        (_, Some(close)) => (close, true),
        (Some(due), None) => (due, false),
        (None, None) => return None,
    };

    let record_type = non_blank(record.record_type)
        .map(|t| t.to_lowercase())
        .unwrap_or_else(|| if from_timing { "quiz" } else { "assignment" }.to_string());
    let is_quiz = record_type == "quiz";

    let title = non_blank(record.title)
        .unwrap_or_else(|| if is_quiz { "Quiz" } else { "Assignment" }.to_string());
    let color = non_blank(record.color)
        .unwrap_or_else(|| if is_quiz { QUIZ_COLOR } else { ASSIGNMENT_COLOR }.to_string());

    let time = record
        .end
        .as_ref()
        .and_then(|end| end.time_in(&Local))
        .or_else(|| due.time_in(&Local));

    let mut raw = RawEvent::new(SourceKind::Assignment, due, title)
        .with_color(color)
        .with_metadata("type", record_type);

    if let Some(time) = time {
        raw = raw.with_time(time.format("%H:%M").to_string());
    }
    if let Some(id) = record.assignment_id.or(record.object_id) {
        raw = raw.with_metadata("assignmentId", id);
    }
    if let Some(class_id) = record.class_id.or(record.class_id_upper) {
        raw = raw.with_metadata("classId", class_id);
    }
    if let Some(status) = non_blank(record.status) {
        raw = raw
            .with_status(status.as_str())
            .with_metadata("status", status);
    }
    if let Some(subtitle) = non_blank(record.subtitle) {
        raw = raw.with_metadata("subtitle", subtitle);
    }
    Some(raw)
}

/// Fetches assignment and quiz due dates.
#[derive(Debug, Clone)]
pub struct AssignmentAdapter {
    client: ApiClient,
    path: String,
}

impl AssignmentAdapter {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            path: DEFAULT_PATH.to_string(),
        }
    }

    /// Overrides the endpoint path (default `/assignments`).
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

impl SourceAdapter for AssignmentAdapter {
    fn name(&self) -> &str {
        "assignments"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Assignment
    }

    fn fetch_raw(&self) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>> {
        Box::pin(async move {
            let records = self.client.get_records(&self.path).await?;
            Ok(decode_records(self.name(), records, map_assignment))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn map(value: Value) -> Option<RawEvent> {
        map_assignment(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn assignment_record() {
        let raw = map(json!({
            "_id": "a-1",
            "dueDate": "2025-09-01T23:59:00",
            "title": "Essay",
            "classID": "c-9",
            "status": "pending",
            "subtitle": "English 101"
        }))
        .unwrap();

        assert_eq!(raw.title, "Essay");
        assert_eq!(raw.raw_date, DateLike::from("2025-09-01T23:59:00"));
        assert_eq!(raw.effective_color(), ASSIGNMENT_COLOR);
        assert_eq!(raw.time.as_deref(), Some("23:59"));
        assert_eq!(raw.status.as_deref(), Some("pending"));
        assert_eq!(raw.metadata["type"], "assignment");
        assert_eq!(raw.metadata["assignmentId"], "a-1");
        assert_eq!(raw.metadata["classId"], "c-9");
        assert_eq!(raw.metadata["status"], "pending");
        assert_eq!(raw.metadata["subtitle"], "English 101");
    }

    #[test]
    fn quiz_record_uses_timing_close() {
        let raw = map(json!({
            "title": "Quiz 1",
            "timing": {"open": "2025-09-03T08:00:00", "close": "2025-09-05T17:30:00"},
            "assignmentId": 42
        }))
        .unwrap();

        assert_eq!(raw.raw_date, DateLike::from("2025-09-05T17:30:00"));
        assert_eq!(raw.metadata["type"], "quiz");
        assert_eq!(raw.effective_color(), QUIZ_COLOR);
        assert_eq!(raw.time.as_deref(), Some("17:30"));
        assert_eq!(raw.metadata["assignmentId"], 42);
    }

    #[test]
    fn end_overrides_display_time_and_color_hint_wins() {
        let raw = map(json!({
            "dueDate": "2025-09-01",
            "end": "2025-09-01T10:15:00",
            "type": "Quiz",
            "color": "#000000"
        }))
        .unwrap();

        assert_eq!(raw.time.as_deref(), Some("10:15"));
        assert_eq!(raw.title, "Quiz");
        assert_eq!(raw.effective_color(), "#000000");
    }

    #[test]
    fn date_only_due_has_no_time() {
        let raw = map(json!({"dueDate": "2025-09-01", "title": "Reading"})).unwrap();
        assert!(raw.time.is_none());
    }

    #[test]
    fn unusable_due_date_falls_back_to_timing_close() {
        let raw = map(json!({
            "title": "Quiz 3",
            "dueDate": "",
            "timing": {"close": "2025-10-10T09:00:00"}
        }))
        .unwrap();
        assert_eq!(raw.raw_date, DateLike::from("2025-10-10T09:00:00"));
        assert_eq!(raw.metadata["type"], "quiz");
        assert_eq!(raw.time.as_deref(), Some("09:00"));

        let event = crate::normalize::to_event(&raw).unwrap();
        assert_eq!(event.date_key().to_string(), "2025-10-10");

        let raw = map(json!({"dueDate": "soon", "timing": {"close": "2025-10-11"}})).unwrap();
        assert_eq!(raw.raw_date, DateLike::from("2025-10-11"));
    }

    #[test]
    fn unusable_due_date_without_timing_is_left_for_normalization() {
        let raw = map(json!({"title": "Essay", "dueDate": "soon"})).unwrap();
        assert_eq!(raw.raw_date, DateLike::from("soon"));
        assert!(crate::normalize::to_event(&raw).is_err());
    }

    #[test]
    fn records_without_due_date_are_dropped() {
        assert!(map(json!({"title": "Draft"})).is_none());
        assert!(map(json!({"title": "Draft", "dueDate": null, "timing": {}})).is_none());
    }

    #[tokio::test]
    async fn same_day_due_dates_keep_source_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/assignments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"dueDate": "2025-09-01T23:59:00", "title": "Late"},
                {"title": "No due date"},
                {"dueDate": "2025-09-01T08:00:00", "title": "Early"}
            ])))
            .mount(&server)
            .await;

        let client = ApiClient::new(ApiConfig::new(server.uri()).unwrap()).unwrap();
        let events = AssignmentAdapter::new(client).fetch().await;
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Late", "Early"]);
    }

    #[tokio::test]
    async fn custom_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/quizzes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"timing": {"close": "2025-10-10T09:00:00"}}
            ])))
            .mount(&server)
            .await;

        let client = ApiClient::new(ApiConfig::new(server.uri()).unwrap()).unwrap();
        let events = AssignmentAdapter::new(client)
            .with_path("/api/quizzes")
            .fetch()
            .await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Quiz");
    }
}

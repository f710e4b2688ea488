//! Public holidays from a Nager.Date compatible API.

use campuscal_core::DateLike;
use serde::Deserialize;

use crate::adapter::{BoxFuture, SourceAdapter};
use crate::error::ProviderResult;
use crate::http::ApiClient;
use crate::raw_event::{HOLIDAY_COLOR, RawEvent, SourceKind};
use crate::sources::{decode_records, non_blank};

/// Title used when a holiday has no local name.
const DEFAULT_TITLE: &str = "Holiday";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HolidayRecord {
    date: DateLike,
    #[serde(default)]
    local_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Fetches the public holidays of one country for one year.
#[derive(Debug, Clone)]
pub struct HolidayAdapter {
    client: ApiClient,
    country: String,
    year: i32,
}

impl HolidayAdapter {
    pub const DEFAULT_BASE_URL: &'static str = "https://date.nager.at";
    pub const DEFAULT_COUNTRY: &'static str = "PH";

    pub fn new(client: ApiClient, country: impl Into<String>, year: i32) -> Self {
        Self {
            client,
            country: country.into(),
            year,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    fn path(&self) -> String {
        format!(
            "/api/v3/PublicHolidays/{}/{}",
            self.year,
            urlencoding::encode(&self.country)
        )
    }
}

fn map_holiday(record: HolidayRecord) -> Option<RawEvent> {
    let title = non_blank(record.local_name).unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let mut raw =
        RawEvent::new(SourceKind::Holiday, record.date, title).with_color(HOLIDAY_COLOR);
    if let Some(name) = non_blank(record.name) {
        raw = raw.with_metadata("name", name);
    }
    Some(raw)
}

impl SourceAdapter for HolidayAdapter {
    fn name(&self) -> &str {
        "holidays"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Holiday
    }

    fn fetch_raw(&self) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>> {
        Box::pin(async move {
            let records = self.client.get_records(&self.path()).await?;
            Ok(decode_records(self.name(), records, map_holiday))
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

    async fn adapter_for(server: &MockServer) -> HolidayAdapter {
        let client = ApiClient::new(ApiConfig::new(server.uri()).unwrap()).unwrap();
        HolidayAdapter::new(client, "PH", 2025)
    }

    #[tokio::test]
    async fn christmas() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/PublicHolidays/2025/PH"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"date": "2025-12-25", "localName": "Christmas Day", "name": "Christmas Day"}
            ])))
            .mount(&server)
            .await;

        let events = adapter_for(&server).await.fetch().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source_kind, SourceKind::Holiday);
        assert_eq!(events[0].title, "Christmas Day");
        assert_eq!(events[0].raw_date, DateLike::from("2025-12-25"));
        assert_eq!(events[0].effective_color(), HOLIDAY_COLOR);
    }

    #[tokio::test]
    async fn missing_local_name_and_missing_date() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/PublicHolidays/2025/PH"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"date": "2025-06-12", "localName": ""},
                {"localName": "No date"}
            ])))
            .mount(&server)
            .await;

        let events = adapter_for(&server).await.fetch().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Holiday");
    }

    #[tokio::test]
    async fn server_error_yields_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        assert!(adapter.fetch_raw().await.is_err());
        assert!(adapter.fetch().await.is_empty());
    }
}

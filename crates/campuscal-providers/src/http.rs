//! JSON-over-HTTP client shared by the adapters.
//!
//! Handles base URL joining, optional bearer authentication, timeouts, and
//! the mapping from HTTP status codes to [`ProviderError`]s.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{trace, warn};
use url::Url;

use crate::error::{ProviderError, ProviderResult};

/// Connection settings for one remote API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are appended to it.
    pub base_url: Url,

    /// Bearer token sent with every request, if any.
    pub token: Option<String>,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl ApiConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(base_url.as_ref())?;
        Ok(Self {
            base_url: parsed,
            token: None,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("campuscal/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Appends `path` to the base URL, keeping any base path prefix.
    pub fn endpoint(&self, path: &str) -> ProviderResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let joined = format!("{}/{}", base, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| {
            ProviderError::configuration(format!("invalid endpoint URL {}", joined)).with_cause(e)
        })
    }
}

/// HTTP client for one remote API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Creates a client with the given configuration.
    pub fn new(config: ApiConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ProviderError::network("failed to create HTTP client").with_cause(e))?;

        Ok(Self { client, config })
    }

    /// Performs a GET and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ProviderResult<T> {
        let url = self.config.endpoint(path)?;

        let mut request = self.client.get(url.clone()).header(ACCEPT, "application/json");
        if let Some(token) = self.config.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        trace!(url = %url, "sending request");
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("request to {} failed", url)).with_cause(e))?;

        let body = self.handle_response(response).await?;
        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("malformed JSON from {}", url)).with_cause(e)
        })
    }

    /// Performs a GET on an endpoint that returns a JSON array.
    ///
    /// Each element is returned undecoded so callers can drop malformed
    /// records one by one.
    pub async fn get_records(&self, path: &str) -> ProviderResult<Vec<Value>> {
        match self.get_json::<Value>(path).await? {
            Value::Array(records) => Ok(records),
            other => Err(ProviderError::invalid_response(format!(
                "expected a JSON array from {}, got {}",
                path,
                json_type(&other)
            ))),
        }
    }

    async fn handle_response(&self, response: Response) -> ProviderResult<String> {
        let status = response.status();
        trace!(status = %status, "received response");

        match status {
            s if s.is_success() => response
                .text()
                .await
                .map_err(|e| ProviderError::network("failed to read response body").with_cause(e)),
            StatusCode::UNAUTHORIZED => Err(ProviderError::authentication(
                "request rejected: missing or expired token",
            )),
            StatusCode::FORBIDDEN => Err(ProviderError::authorization("access denied")),
            StatusCode::NOT_FOUND => Err(ProviderError::not_found(format!(
                "{} not found",
                response.url().path()
            ))),
            StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::rate_limited("too many requests")),
            s if s.is_server_error() => {
                let body = response.text().await.unwrap_or_default();
                Err(ProviderError::server(format!("server error ({}): {}", s, body)))
            }
            s => {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %s, body = %body, "unexpected response status");
                Err(ProviderError::invalid_response(format!(
                    "unexpected status {}: {}",
                    s, body
                )))
            }
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn config_builder() {
        let config = ApiConfig::new("https://lms.example.com/")
            .unwrap()
            .with_token("secret")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent");

        assert!(config.has_token());
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent");
        assert!(!ApiConfig::new("https://x.test").unwrap().with_token("").has_token());
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let config = ApiConfig::new("https://lms.example.com/backend/").unwrap();
        assert_eq!(
            config.endpoint("/api/class-dates").unwrap().as_str(),
            "https://lms.example.com/backend/api/class-dates"
        );
        let bare = ApiConfig::new("https://lms.example.com").unwrap();
        assert_eq!(
            bare.endpoint("events").unwrap().as_str(),
            "https://lms.example.com/events"
        );
    }

    #[test]
    fn invalid_base_url() {
        assert!(ApiConfig::new("not a url").is_err());
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/items"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(ApiConfig::new(server.uri()).unwrap().with_token("tok")).unwrap();
        let records = client.get_records("/api/items").await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn maps_status_codes() {
        let server = MockServer::start().await;
        for (route, status) in [("/unauth", 401), ("/missing", 404), ("/boom", 503)] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;
        }

        let client = ApiClient::new(ApiConfig::new(server.uri()).unwrap()).unwrap();
        let code = |r: ProviderResult<Vec<Value>>| r.unwrap_err().code();
        assert_eq!(
            code(client.get_records("/unauth").await),
            ProviderErrorCode::AuthenticationFailed
        );
        assert_eq!(code(client.get_records("/missing").await), ProviderErrorCode::NotFound);
        assert_eq!(code(client.get_records("/boom").await), ProviderErrorCode::ServerError);
    }

    #[tokio::test]
    async fn rejects_non_array_and_bad_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/object"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"a": 1})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = ApiClient::new(ApiConfig::new(server.uri()).unwrap()).unwrap();
        let err = client.get_records("/object").await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        assert!(err.message().contains("an object"));
        let err = client.get_records("/garbage").await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let client = ApiClient::new(
            ApiConfig::new("http://127.0.0.1:9")
                .unwrap()
                .with_timeout(Duration::from_secs(2)),
        )
        .unwrap();
        let err = client.get_records("/x").await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::NetworkError);
    }
}

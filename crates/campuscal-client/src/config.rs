//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/campuscal/config.toml` by default.
//!
//! The API `token` supports secret references:
//! - `pass::path/in/store`: resolved via `pass show`
//! - `env::VAR_NAME`: resolved from the environment
//! - plain text: used as-is

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use campuscal_providers::{ApiConfig, HolidayAdapter};

use crate::error::{ClientError, ClientResult};

const DEFAULT_API_URL: &str = "https://juanlms-webapp-server.onrender.com";

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the campuscal client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// School API settings, shared by class days, assignments and events.
    pub api: ApiSettings,

    /// Public holiday source settings.
    pub holidays: HolidaySettings,

    /// Which school API sources to fetch.
    pub sources: SourceSettings,

    /// Display settings.
    pub display: DisplaySettings,
}

/// School API connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,

    /// Bearer token (supports `pass::` and `env::` prefixes).
    pub token: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout_secs: ApiConfig::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiSettings {
    /// Resolves the token, following secret references.
    pub fn resolve_token(&self) -> ClientResult<Option<String>> {
        self.token
            .as_deref()
            .map(|raw| {
                crate::secret::resolve(raw)
                    .map_err(|e| ClientError::Secret(format!("failed to resolve api token: {}", e)))
            })
            .transpose()
    }

    /// Builds the connection settings for the school API.
    pub fn to_api_config(&self) -> ClientResult<ApiConfig> {
        let mut config = api_config(&self.base_url, self.timeout_secs)?;
        if let Some(token) = self.resolve_token()? {
            config = config.with_token(token);
        }
        Ok(config)
    }
}

/// Public holiday source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolidaySettings {
    pub enabled: bool,
    pub base_url: String,

    /// ISO 3166-1 alpha-2 country code.
    pub country: String,

    /// Year to fetch; the current year when unset.
    pub year: Option<i32>,
}

impl Default for HolidaySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: HolidayAdapter::DEFAULT_BASE_URL.to_string(),
            country: HolidayAdapter::DEFAULT_COUNTRY.to_string(),
            year: None,
        }
    }
}

impl HolidaySettings {
    pub fn year_or_current(&self) -> i32 {
        self.year.unwrap_or_else(|| Local::now().year())
    }

    pub fn to_api_config(&self, timeout_secs: u64) -> ClientResult<ApiConfig> {
        api_config(&self.base_url, timeout_secs)
    }
}

/// School API sources to fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub class_days: bool,
    pub assignments: bool,
    pub events: bool,

    /// Endpoint path of the assignment list.
    pub assignments_path: String,

    /// Endpoint path of the event list.
    pub events_path: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            class_days: true,
            assignments: true,
            events: true,
            assignments_path: "/assignments".to_string(),
            events_path: "/events".to_string(),
        }
    }
}

/// Display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Show placeholder events when every source comes back empty.
    pub fallback: bool,

    /// Always render six full weeks.
    pub fixed_height: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            fallback: true,
            fixed_height: false,
        }
    }
}

fn api_config(base_url: &str, timeout_secs: u64) -> ClientResult<ApiConfig> {
    let config = ApiConfig::new(base_url)
        .map_err(|e| ClientError::Config(format!("invalid base_url {:?}: {}", base_url, e)))?;
    Ok(config.with_timeout(Duration::from_secs(timeout_secs)))
}

impl ClientConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the default configuration.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ClientError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("campuscal")
    }

    /// Checks URLs, paths and the token reference.
    pub fn validate(&self) -> ClientResult<()> {
        if self.api.timeout_secs == 0 {
            return Err(ClientError::Config("api.timeout_secs must be positive".into()));
        }
        self.api.to_api_config()?;
        self.holidays.to_api_config(self.api.timeout_secs)?;

        let country = &self.holidays.country;
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ClientError::Config(format!(
                "holidays.country must be a two-letter country code, got {:?}",
                country
            )));
        }

        for (key, path) in [
            ("sources.assignments_path", &self.sources.assignments_path),
            ("sources.events_path", &self.sources.events_path),
        ] {
            if !path.starts_with('/') {
                return Err(ClientError::Config(format!(
                    "{} must start with '/', got {:?}",
                    key, path
                )));
            }
        }
        Ok(())
    }
}

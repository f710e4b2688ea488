//! Class days of the active academic term.
//!
//! Fetching is a two-step pipeline: resolve the active school year and its
//! active term, then fetch the class dates. If either lookup fails the
//! adapter short-circuits with a `dependency_failed` error instead of
//! guessing a default term.

use std::fmt;

use campuscal_core::DateLike;
use serde::Deserialize;
use tracing::debug;

use crate::adapter::{BoxFuture, SourceAdapter};
use crate::error::{ProviderError, ProviderResult};
use crate::http::ApiClient;
use crate::raw_event::{CLASS_DAY_COLOR, RawEvent, SourceKind};
use crate::sources::decode_records;

const ACTIVE_SCHOOL_YEAR_PATH: &str = "/api/schoolyears/active";
const CLASS_DATES_PATH: &str = "/api/class-dates";
const CLASS_DAY_TITLE: &str = "Class Day";

/// A school year bound, reported either as a number or as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum YearPart {
    Number(i64),
    Text(String),
}

impl fmt::Display for YearPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s.trim()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchoolYear {
    school_year_start: YearPart,
    school_year_end: YearPart,
}

impl SchoolYear {
    fn name(&self) -> String {
        format!("{}-{}", self.school_year_start, self.school_year_end)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TermRecord {
    #[serde(default)]
    term_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClassDateRecord {
    date: DateLike,
}

/// The resolved active academic term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTerm {
    /// School year name, e.g. "2025-2026".
    pub school_year: String,
    pub term_name: String,
}

/// Fetches the class days of the active term.
#[derive(Debug, Clone)]
pub struct ClassDayAdapter {
    client: ApiClient,
}

impl ClassDayAdapter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Resolves the active school year, then its active term.
    ///
    /// # Errors
    ///
    /// Returns a `dependency_failed` error if either lookup fails or no term
    /// is marked active.
    pub async fn resolve_active_term(&self) -> ProviderResult<ActiveTerm> {
        let year: Option<SchoolYear> = self
            .client
            .get_json(ACTIVE_SCHOOL_YEAR_PATH)
            .await
            .map_err(|e| ProviderError::dependency("active school year lookup failed").with_cause(e))?;
        let year = year.ok_or_else(|| ProviderError::dependency("no active school year"))?;
        let school_year = year.name();

        let path = format!("/api/terms/schoolyear/{}", urlencoding::encode(&school_year));
        let terms = self.client.get_records(&path).await.map_err(|e| {
            ProviderError::dependency(format!("term lookup for {} failed", school_year)).with_cause(e)
        })?;

        // A malformed term only hides itself, not the active one next to it.
        let term = terms
            .into_iter()
            .enumerate()
            .filter_map(|(position, record)| {
                serde_json::from_value::<TermRecord>(record)
                    .inspect_err(|e| {
                        debug!(school_year = %school_year, position, error = %e, "skipping malformed term");
                    })
                    .ok()
            })
            .find(|t| t.status.as_deref() == Some("active"))
            .ok_or_else(|| {
                ProviderError::dependency(format!("no active term for school year {}", school_year))
            })?;

        let term_name = term.term_name.unwrap_or_default();
        debug!(school_year = %school_year, term = %term_name, "resolved active term");
        Ok(ActiveTerm {
            school_year,
            term_name,
        })
    }
}

impl SourceAdapter for ClassDayAdapter {
    fn name(&self) -> &str {
        "class-days"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::ClassDay
    }

    fn fetch_raw(&self) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>> {
        Box::pin(async move {
            let term = self.resolve_active_term().await?;
            let records = self.client.get_records(CLASS_DATES_PATH).await?;

            Ok(decode_records(self.name(), records, |record: ClassDateRecord| {
                let mut raw = RawEvent::new(SourceKind::ClassDay, record.date, CLASS_DAY_TITLE)
                    .with_color(CLASS_DAY_COLOR);
                if !term.term_name.is_empty() {
                    raw = raw.with_metadata("termName", term.term_name.as_str());
                }
                Some(raw)
            }))
        })
    }
}

//! SourceAdapter trait definition.
//!
//! A source adapter fetches one category of calendar data (holidays, class
//! days, assignments, school events) and maps it into [`RawEvent`]s. Adapters
//! implement [`SourceAdapter::fetch_raw`] with normal error propagation; the
//! provided [`SourceAdapter::fetch`] is what the aggregator calls, and it
//! never fails: any error becomes a log line and an empty list.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::{RawEvent, SourceKind};

/// A boxed future for async trait methods.
///
/// Keeps [`SourceAdapter`] object-safe so adapters can be held as
/// `Arc<dyn SourceAdapter>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A single origin of calendar data.
///
/// # Example Implementation
///
/// ```ignore
/// struct Announcements { client: ApiClient }
///
/// impl SourceAdapter for Announcements {
///     fn name(&self) -> &str { "announcements" }
///     fn kind(&self) -> SourceKind { SourceKind::GenericEvent }
///
///     fn fetch_raw(&self) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>> {
///         Box::pin(async move {
///             let records = self.client.get_records("/announcements").await?;
///             Ok(decode_records(self.name(), records, map_announcement))
///         })
///     }
/// }
/// ```
pub trait SourceAdapter: Send + Sync {
    /// Short name used in logs and reports (e.g. "holidays").
    fn name(&self) -> &str;

    /// The kind of events this adapter produces.
    fn kind(&self) -> SourceKind;

    /// Fetches and maps records, propagating failures.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network errors, unexpected responses, or a
    /// failed prerequisite lookup.
    fn fetch_raw(&self) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>>;

    /// Fetches records, absorbing any failure into an empty result.
    fn fetch(&self) -> BoxFuture<'_, Vec<RawEvent>> {
        Box::pin(async move {
            match self.fetch_raw().await {
                Ok(events) => {
                    debug!(source = %self.name(), count = events.len(), "source fetched");
                    events
                }
                Err(e) => {
                    let e = if e.source_name().is_some() {
                        e
                    } else {
                        e.with_source_name(self.name())
                    };
                    warn!(source = %self.name(), code = %e.code(), error = %e, "source failed, contributing no events");
                    Vec::new()
                }
            }
        })
    }
}

/// An adapter that always fails.
///
/// Stands in for a source that could not be constructed, so the failure
/// shows up in logs at fetch time instead of aborting the whole run.
#[derive(Debug)]
pub struct ErrorAdapter {
    name: String,
    kind: SourceKind,
    error: ProviderError,
}

impl ErrorAdapter {
    pub fn new(name: impl Into<String>, kind: SourceKind, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            kind,
            error,
        }
    }
}

impl SourceAdapter for ErrorAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn fetch_raw(&self) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>> {
        // ProviderError is not Clone, rebuild it from its parts
        let error =
            ProviderError::new(self.error.code(), self.error.message()).with_source_name(&self.name);
        Box::pin(async move { Err(error) })
    }
}

/// An adapter that returns a fixed list of records.
#[derive(Debug, Clone)]
pub struct StaticAdapter {
    name: String,
    kind: SourceKind,
    events: Vec<RawEvent>,
}

impl StaticAdapter {
    pub fn new(name: impl Into<String>, kind: SourceKind, events: Vec<RawEvent>) -> Self {
        Self {
            name: name.into(),
            kind,
            events,
        }
    }
}

impl SourceAdapter for StaticAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn fetch_raw(&self) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>> {
        let events = self.events.clone();
        Box::pin(async move { Ok(events) })
    }
}

//! Event aggregation across all sources.
//!
//! Every adapter is fetched concurrently. Results are collected in the
//! order the adapters settle, then folded into a [`CalendarIndex`] in that
//! same order, so within one day the events of the first source to answer
//! come first. A failing adapter contributes nothing; aggregation itself
//! never fails.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use serde::Serialize;
use tracing::{debug, info};

use campuscal_core::CalendarIndex;
use campuscal_providers::{RawEvent, SourceAdapter, SourceKind, to_events};

/// A shared, type-erased adapter.
pub type AdapterRef = Arc<dyn SourceAdapter>;

/// What one source contributed to an aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub name: String,
    pub kind: SourceKind,
    /// Raw records the adapter returned.
    pub fetched: usize,
    /// Events that made it into the index.
    pub kept: usize,
    /// Records dropped for an invalid date.
    pub dropped: usize,
}

/// Per-source summary of an aggregation run, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
    sources: Vec<SourceReport>,
}

impl AggregationReport {
    /// Source reports in the order the sources settled.
    pub fn sources(&self) -> &[SourceReport] {
        &self.sources
    }

    pub fn total_kept(&self) -> usize {
        self.sources.iter().map(|s| s.kept).sum()
    }

    pub fn total_dropped(&self) -> usize {
        self.sources.iter().map(|s| s.dropped).sum()
    }

    /// Names of sources that contributed no events.
    pub fn silent_sources(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .filter(|s| s.kept == 0)
            .map(|s| s.name.as_str())
    }
}

/// Fetches all adapters concurrently and folds their events into an index.
pub async fn aggregate(adapters: &[AdapterRef]) -> CalendarIndex {
    aggregate_with_report(adapters).await.0
}

/// Same as [`aggregate`], also returning what each source contributed.
pub async fn aggregate_with_report(adapters: &[AdapterRef]) -> (CalendarIndex, AggregationReport) {
    debug!(sources = adapters.len(), "starting aggregation");

    let mut pending: FuturesUnordered<_> = adapters
        .iter()
        .map(|adapter| async move { (adapter, adapter.fetch().await) })
        .collect();

    // Wait for every source to settle before touching the index.
    let mut settled: Vec<(&AdapterRef, Vec<RawEvent>)> = Vec::with_capacity(adapters.len());
    while let Some(result) = pending.next().await {
        settled.push(result);
    }

    let mut builder = CalendarIndex::builder();
    let mut report = AggregationReport::default();
    for (adapter, raw_events) in settled {
        let (events, dropped) = to_events(&raw_events);
        if dropped > 0 {
            debug!(source = %adapter.name(), dropped, "dropped events with invalid dates");
        }

        report.sources.push(SourceReport {
            name: adapter.name().to_string(),
            kind: adapter.kind(),
            fetched: raw_events.len(),
            kept: events.len(),
            dropped,
        });
        builder.extend(events);
    }

    let index = builder.build();
    info!(
        sources = report.sources.len(),
        event_count = index.event_count(),
        date_count = index.date_count(),
        dropped = report.total_dropped(),
        "aggregation complete"
    );
    (index, report)
}

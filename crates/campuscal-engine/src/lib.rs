//! Event aggregation and the live calendar store.
//!
//! This crate turns a set of [`SourceAdapter`](campuscal_providers::SourceAdapter)s
//! into a [`CalendarIndex`](campuscal_core::CalendarIndex):
//! - [`aggregate`] fetches all sources concurrently and folds their events
//! - [`CalendarStore`] keeps the live index of one consumer, discarding
//!   stale or abandoned runs
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use campuscal_engine::{AdapterRef, CalendarStore, FallbackPolicy};
//! use campuscal_providers::{SourceKind, StaticAdapter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let adapters: Vec<AdapterRef> =
//!         vec![Arc::new(StaticAdapter::new("events", SourceKind::GenericEvent, vec![]))];
//!
//!     let store = CalendarStore::new();
//!     store.refresh(&adapters, FallbackPolicy::Enabled).await;
//!     println!("{} events", store.snapshot().await.event_count());
//! }
//! ```

mod aggregator;
mod store;

pub use aggregator::{AdapterRef, AggregationReport, SourceReport, aggregate, aggregate_with_report};
pub use store::{CalendarStore, FallbackPolicy, RefreshOutcome, RunId};

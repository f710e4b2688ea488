//! Command implementations.

pub mod config;
pub mod day;
pub mod month;
pub mod sources;

use std::sync::Arc;

use tracing::debug;

use campuscal_core::CalendarIndex;
use campuscal_engine::{CalendarStore, FallbackPolicy};

use crate::adapters::build_adapters;
use crate::config::ClientConfig;

/// Runs one refresh and returns the resulting index.
///
/// The fallback policy comes from `[display] fallback` unless `no_fallback`
/// overrides it.
pub(crate) async fn load_index(config: &ClientConfig, no_fallback: bool) -> Arc<CalendarIndex> {
    let adapters = build_adapters(config);
    let policy = FallbackPolicy::from(config.display.fallback && !no_fallback);

    let store = CalendarStore::new();
    let outcome = store.refresh(&adapters, policy).await;
    debug!(run = %outcome.run(), applied = outcome.is_applied(), "calendar loaded");
    store.snapshot().await
}

/// Prints a value as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> crate::error::ClientResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

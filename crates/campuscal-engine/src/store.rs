//! The live calendar index of one consumer.
//!
//! A [`CalendarStore`] owns the index a view renders from. Each refresh is
//! tagged with a [`RunId`]; a finished run is committed only if no newer
//! run has started since, so a slow refresh can never overwrite a faster,
//! later one. The index is swapped as a whole behind an `Arc`, so readers
//! see either the previous or the new complete index.
//!
//! [`CalendarStore::teardown`] abandons in-flight refreshes: their
//! aggregation futures are dropped, which cancels outstanding requests,
//! and nothing is committed afterwards.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

use campuscal_core::{CalendarIndex, apply_fallback};

use crate::aggregator::{AdapterRef, aggregate};

/// Identifier of one aggregation run, strictly increasing per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u64);

impl RunId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether an empty aggregation result is replaced with placeholder events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    #[default]
    Enabled,
    Disabled,
}

impl From<bool> for FallbackPolicy {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

/// How a refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The new index is live.
    Applied(RunId),
    /// A newer run started first; the result was discarded.
    Stale(RunId),
    /// The store was torn down before the run finished.
    Abandoned(RunId),
}

impl RefreshOutcome {
    pub fn run(&self) -> RunId {
        match self {
            Self::Applied(run) | Self::Stale(run) | Self::Abandoned(run) => *run,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

#[derive(Debug)]
struct Committed {
    index: Arc<CalendarIndex>,
    run: Option<RunId>,
}

/// Holds the committed index and guards it against stale results.
#[derive(Debug)]
pub struct CalendarStore {
    committed: RwLock<Committed>,
    /// Last issued run id; zero means none yet.
    latest_run: AtomicU64,
    has_committed: AtomicBool,
    /// Set while run #1 is being refreshed.
    first_in_flight: AtomicBool,
    torn_down: AtomicBool,
    teardown_tx: watch::Sender<bool>,
}

impl Default for CalendarStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarStore {
    /// Creates a store holding an empty index.
    pub fn new() -> Self {
        let (teardown_tx, _) = watch::channel(false);
        Self {
            committed: RwLock::new(Committed {
                index: Arc::new(CalendarIndex::new()),
                run: None,
            }),
            latest_run: AtomicU64::new(0),
            has_committed: AtomicBool::new(false),
            first_in_flight: AtomicBool::new(false),
            torn_down: AtomicBool::new(false),
            teardown_tx,
        }
    }

    /// Issues the id of a new run, superseding every earlier one.
    pub fn begin_run(&self) -> RunId {
        let id = self.latest_run.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(run = id, "aggregation run started");
        RunId(id)
    }

    /// Makes `index` live if `run` is still the latest run.
    ///
    /// Returns false and discards the index if a newer run has started, a
    /// newer or equal run was already committed, or the store was torn down.
    pub async fn commit(&self, run: RunId, index: CalendarIndex) -> bool {
        let mut committed = self.committed.write().await;

        if self.is_torn_down() {
            debug!(run = %run, "store torn down, discarding result");
            return false;
        }
        if run.0 != self.latest_run.load(Ordering::SeqCst)
            || committed.run.is_some_and(|last| last >= run)
        {
            debug!(run = %run, "discarding stale aggregation result");
            return false;
        }

        committed.index = Arc::new(index);
        committed.run = Some(run);
        self.has_committed.store(true, Ordering::SeqCst);
        info!(
            run = %run,
            event_count = committed.index.event_count(),
            "calendar index updated"
        );
        true
    }

    /// Aggregates `adapters`, applies the fallback policy, and commits.
    ///
    /// Races the aggregation against [`teardown`](Self::teardown); a torn
    /// down store drops the in-flight aggregation and reports
    /// [`RefreshOutcome::Abandoned`].
    pub async fn refresh(&self, adapters: &[AdapterRef], policy: FallbackPolicy) -> RefreshOutcome {
        let run = self.begin_run();
        let _first = (run.0 == 1).then(|| FirstRun::enter(&self.first_in_flight));
        let mut teardown = self.teardown_tx.subscribe();

        if self.is_torn_down() {
            return RefreshOutcome::Abandoned(run);
        }

        let index = tokio::select! {
            biased;
            _ = teardown.wait_for(|torn_down| *torn_down) => {
                info!(run = %run, "aggregation abandoned");
                return RefreshOutcome::Abandoned(run);
            }
            index = aggregate(adapters) => index,
        };

        let index = match policy {
            FallbackPolicy::Enabled => apply_fallback(index),
            FallbackPolicy::Disabled => index,
        };

        if self.commit(run, index).await {
            RefreshOutcome::Applied(run)
        } else if self.is_torn_down() {
            RefreshOutcome::Abandoned(run)
        } else {
            RefreshOutcome::Stale(run)
        }
    }

    /// Abandons in-flight refreshes and blocks all later commits.
    pub fn teardown(&self) {
        if !self.torn_down.swap(true, Ordering::SeqCst) {
            debug!("calendar store torn down");
        }
        self.teardown_tx.send_replace(true);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Returns the committed index.
    pub async fn snapshot(&self) -> Arc<CalendarIndex> {
        self.committed.read().await.index.clone()
    }

    /// Returns the run whose index is live, if any.
    pub async fn committed_run(&self) -> Option<RunId> {
        self.committed.read().await.run
    }

    /// True while the store's first run is in flight and nothing is
    /// committed yet.
    ///
    /// Later runs never report loading, even when the first one ended
    /// stale or abandoned without committing.
    pub fn is_loading(&self) -> bool {
        !self.has_committed.load(Ordering::SeqCst) && self.first_in_flight.load(Ordering::SeqCst)
    }
}

/// Marks the first run as in flight until dropped.
struct FirstRun<'a>(&'a AtomicBool);

impl<'a> FirstRun<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for FirstRun<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

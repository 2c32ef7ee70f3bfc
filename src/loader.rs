//! Load lifecycle: the state machine, the store that holds it, and the
//! orchestrator that drives it from a [`TradeFeed`].
//!
//! ```text
//! Idle ──begin──▶ Loading ──ok──▶ Loaded
//!                  ▲   │
//!            retry │   └─err──▶ Failed
//!                  └────────────────┘
//! ```

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::cancel::CancelToken;
use crate::error::{DashboardError, FailureKind};
use crate::feed::TradeFeed;
use crate::types::Snapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&DashboardError> for LoadFailure {
    fn from(err: &DashboardError) -> Self {
        Self { kind: err.kind(), message: err.to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded(Snapshot),
    Failed(LoadFailure),
}

impl LoadState {
    pub fn name(&self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Loaded(_) => "loaded",
            LoadState::Failed(_) => "failed",
        }
    }

    /// Only a fresh or failed dashboard may start loading.
    pub fn can_begin_load(&self) -> bool {
        matches!(self, LoadState::Idle | LoadState::Failed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

/// Shared holder of the current [`LoadState`]. Front-ends subscribe and
/// redraw on every change.
#[derive(Debug, Clone)]
pub struct DashboardStore {
    tx: Arc<watch::Sender<LoadState>>,
}

impl DashboardStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LoadState::Idle);
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> LoadState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.tx.subscribe()
    }

    /// Moves to `Loading` if allowed. Returns false when a load is already
    /// running or the dashboard is already loaded.
    pub fn begin_load(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if state.can_begin_load() {
                *state = LoadState::Loading;
                true
            } else {
                false
            }
        })
    }

    /// Commits a finished load. Ignored unless the store is `Loading`.
    pub fn commit(&self, next: LoadState) -> bool {
        if !matches!(next, LoadState::Loaded(_) | LoadState::Failed(_)) {
            return false;
        }
        self.tx.send_if_modified(|state| {
            if matches!(state, LoadState::Loading) {
                *state = next;
                true
            } else {
                false
            }
        })
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
    /// Nothing was committed. The store stays in `Loading` and is not
    /// reloaded; cancellation only happens when the front-end is going away.
    Cancelled,
    /// The store refused to begin (already loading or loaded).
    Skipped,
}

/// Runs one-shot loads against a feed and commits the result to a store.
pub struct Loader<F> {
    feed: Arc<F>,
    store: DashboardStore,
}

impl<F> Clone for Loader<F> {
    fn clone(&self) -> Self {
        Self { feed: Arc::clone(&self.feed), store: self.store.clone() }
    }
}

impl<F: TradeFeed> Loader<F> {
    pub fn new(feed: F, store: DashboardStore) -> Self {
        Self { feed: Arc::new(feed), store }
    }

    pub fn store(&self) -> &DashboardStore {
        &self.store
    }

    /// Fetches trades and status concurrently. Nothing is committed until
    /// both have succeeded, and nothing at all if `cancel` fires first.
    pub async fn load(&self, cancel: &CancelToken) -> LoadOutcome {
        if cancel.is_cancelled() || !self.store.begin_load() {
            return LoadOutcome::Skipped;
        }

        let started = Instant::now();
        let fetch = async {
            tokio::try_join!(self.feed.fetch_trades(), self.feed.fetch_status())
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("dashboard load cancelled before both responses arrived");
                return LoadOutcome::Cancelled;
            }
            result = fetch => result,
        };

        if cancel.is_cancelled() {
            warn!("dashboard load cancelled; discarding responses");
            return LoadOutcome::Cancelled;
        }

        match result {
            Ok((trades, status)) => {
                info!(
                    trades = trades.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "dashboard loaded"
                );
                self.store.commit(LoadState::Loaded(Snapshot { trades, status }));
                LoadOutcome::Loaded
            }
            Err(err) => {
                error!(error = %err, kind = ?err.kind(), "dashboard load failed");
                self.store.commit(LoadState::Failed(LoadFailure::from(&err)));
                LoadOutcome::Failed
            }
        }
    }

    /// User-triggered reload. Only accepted from `Failed`.
    pub async fn retry(&self, cancel: &CancelToken) -> LoadOutcome {
        if !self.store.state().is_failed() {
            return LoadOutcome::Skipped;
        }
        info!("retrying dashboard load");
        self.load(cancel).await
    }
}

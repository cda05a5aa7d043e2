//! Feed synchronisation.
//!
//! [`FeedSyncController`] runs the fetch → fallback → build → publish cycle.
//! The heavy parts (HTTP, cache reads, view-model construction) run on the
//! tokio blocking pool; finished cycles come back over a channel and are
//! applied on the thread that owns the controller when it calls
//! [`pump`](FeedSyncController::pump).
//!
//! ## For contributors
//!
//! * Only `pump` and `set_filter` mutate `all`/`filtered`, and both run on
//!   the owning thread.  Keep it that way: the UI reads those vectors every
//!   frame.
//! * Nothing here is cancellable.  Each `sync` bumps a generation counter and
//!   results from older generations are dropped when they arrive, so the last
//!   sync issued is the one that wins.
//! * The cache is written only after a network result has been published.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::filter::FilterSelection;
use crate::source::{FeedFetcher, FeedRecord};
use crate::store::{CacheWriter, LocalStore};
use crate::view_model::{self, FeedViewModel};

/// Where the controller is in its cycle.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SyncState {
    Idle,
    Loading,
    /// Published from a fresh network fetch.
    Loaded,
    /// The fetch failed; published from the local cache.
    LoadedFromCache,
}

/// Where a published set came from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Origin {
    Network,
    Cache,
}

/// What observers are told after every state change.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StateChange {
    Loading,
    Ready {
        origin: Option<Origin>,
        total: usize,
        visible: usize,
        filter: FilterSelection,
    },
}

/// A finished cycle on its way back to the owning thread.
struct Published {
    generation: u64,
    origin: Origin,
    view_models: Vec<FeedViewModel>,
    /// Present only for network results, which still need caching.
    records: Option<Vec<FeedRecord>>,
}

type Observer = Box<dyn FnMut(&StateChange)>;

pub struct FeedSyncController {
    fetcher: Arc<dyn FeedFetcher>,
    store: Arc<dyn LocalStore>,
    writer: CacheWriter,
    runtime: Handle,
    tx: mpsc::UnboundedSender<Published>,
    rx: mpsc::UnboundedReceiver<Published>,
    generation: u64,
    state: SyncState,
    origin: Option<Origin>,
    filter: FilterSelection,
    all: Vec<FeedViewModel>,
    filtered: Vec<FeedViewModel>,
    last_published: Option<DateTime<Local>>,
    observers: Vec<Observer>,
}

impl FeedSyncController {
    /// Wire a controller to its collaborators.  Spawns the cache writer
    /// thread; cycles are spawned onto `runtime`.
    pub fn new(fetcher: Arc<dyn FeedFetcher>, store: Arc<dyn LocalStore>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = CacheWriter::spawn(Arc::clone(&store));

        Self {
            fetcher,
            store,
            writer,
            runtime,
            tx,
            rx,
            generation: 0,
            state: SyncState::Idle,
            origin: None,
            filter: FilterSelection::default(),
            all: Vec::new(),
            filtered: Vec::new(),
            last_published: None,
            observers: Vec::new(),
        }
    }

    // -- accessors -----------------------------------------------------------

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn filter(&self) -> FilterSelection {
        self.filter
    }

    pub fn all(&self) -> &[FeedViewModel] {
        &self.all
    }

    pub fn filtered(&self) -> &[FeedViewModel] {
        &self.filtered
    }

    pub fn last_published(&self) -> Option<DateTime<Local>> {
        self.last_published
    }

    /// Register a callback invoked after every state change.
    pub fn subscribe(&mut self, observer: impl FnMut(&StateChange) + 'static) {
        self.observers.push(Box::new(observer));
    }

    // -- operations ----------------------------------------------------------

    /// Start a new sync cycle.  Returns immediately.
    pub fn sync(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        self.state = SyncState::Loading;
        self.notify(StateChange::Loading);
        tracing::debug!(generation, source = self.fetcher.name(), "sync started");

        let fetcher = Arc::clone(&self.fetcher);
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let published = run_cycle(fetcher, store, generation).await;
            // The receiver lives as long as the controller.
            let _ = tx.send(published);
        });
    }

    /// Apply every finished cycle that has arrived.  Call on the owning
    /// thread; never blocks.
    ///
    /// Returns how many results were received, including stale ones.
    pub fn pump(&mut self) -> usize {
        let mut received = 0;
        while let Ok(published) = self.rx.try_recv() {
            received += 1;
            self.apply(published);
        }
        received
    }

    /// Change the active filter and recompute the visible list.
    pub fn set_filter(&mut self, selection: FilterSelection) {
        self.filter = selection;
        self.filtered = selection.apply(&self.all);
        tracing::debug!(filter = selection.label(), visible = self.filtered.len(), "filter changed");
        self.notify(self.ready_change());
    }

    /// Look up an item of the filtered list.
    ///
    /// An out-of-range index is a caller bug: it panics in debug builds and
    /// yields `None` in release builds.
    pub fn select_item(&self, index: usize) -> Option<&FeedViewModel> {
        debug_assert!(
            index < self.filtered.len(),
            "selected index {index} out of range for {} items",
            self.filtered.len()
        );
        self.filtered.get(index)
    }

    // -- internals -----------------------------------------------------------

    fn apply(&mut self, published: Published) {
        if published.generation != self.generation {
            tracing::debug!(
                stale = published.generation,
                current = self.generation,
                "discarding result from superseded sync"
            );
            return;
        }

        let Published {
            origin,
            view_models,
            records,
            ..
        } = published;

        self.all = view_models;
        self.state = match origin {
            Origin::Network => SyncState::Loaded,
            Origin::Cache => SyncState::LoadedFromCache,
        };
        self.origin = Some(origin);
        self.filtered = self.filter.apply(&self.all);
        self.last_published = Some(Local::now());
        tracing::info!(?origin, total = self.all.len(), visible = self.filtered.len(), "feed published");
        self.notify(self.ready_change());

        if let Some(records) = records {
            self.writer.persist(records);
        }
    }

    fn ready_change(&self) -> StateChange {
        StateChange::Ready {
            origin: self.origin,
            total: self.all.len(),
            visible: self.filtered.len(),
            filter: self.filter,
        }
    }

    fn notify(&mut self, change: StateChange) {
        for observer in &mut self.observers {
            observer(&change);
        }
    }
}

/// One fetch-or-fallback pass.  Runs on the tokio runtime.
async fn run_cycle(
    fetcher: Arc<dyn FeedFetcher>,
    store: Arc<dyn LocalStore>,
    generation: u64,
) -> Published {
    let source = fetcher.name().to_string();
    // The fetcher handle moves onto the blocking thread and is dropped there.
    let fetched = tokio::task::spawn_blocking(move || fetcher.fetch()).await;

    let failure = match fetched {
        Ok(Ok(records)) => {
            let view_models = view_model::build(records.clone()).await;
            return Published {
                generation,
                origin: Origin::Network,
                view_models,
                records: Some(records),
            };
        }
        Ok(Err(e)) => e.to_string(),
        Err(e) => format!("fetch task failed: {e}"),
    };
    tracing::warn!(%source, error = %failure, "fetch failed; falling back to cache");

    let cached = match tokio::task::spawn_blocking(move || store.read_all()).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(error = %e, "cache read task failed");
            Vec::new()
        }
    };

    Published {
        generation,
        origin: Origin::Cache,
        view_models: view_model::build(cached).await,
        records: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

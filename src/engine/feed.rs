//! Feed controller: owns the authoritative story store and drives periodic expiry sweeps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::store::StoryStore;
use crate::types::Spot;

use super::project::ViewRequest;
use super::SpotEngine;

/// Result of a periodic tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The sweep ran and removed these posts.
    Swept { removed: Vec<String> },
    /// The sweep interval has not elapsed since the last sweep.
    NotDue,
    /// Another tick was still running.
    Skipped,
}

/// Clears the in-flight flag when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Couples a store with the engine. Spots are never cached: every view
/// recomputes from the store's current contents.
pub struct SpotFeed<S: StoryStore> {
    store: Mutex<S>,
    engine: SpotEngine,
    last_sweep: Mutex<Option<u64>>,
    last_refresh: Mutex<Option<u64>>,
    in_flight: AtomicBool,
}

/// Whether `interval_secs` have passed since `last`. Never-run is always due.
fn interval_elapsed(last: Option<u64>, now: u64, interval_secs: u64) -> bool {
    match last {
        None => true,
        Some(last) => now >= last.saturating_add(interval_secs.saturating_mul(1000)),
    }
}

impl<S: StoryStore> SpotFeed<S> {
    /// Create a feed over a store.
    pub fn new(store: S, engine: SpotEngine) -> Self {
        Self {
            store: Mutex::new(store),
            engine,
            last_sweep: Mutex::new(None),
            last_refresh: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Lock the store for reads or writes.
    ///
    /// The guard must be dropped before calling [`tick`](Self::tick),
    /// [`sweep_now`](Self::sweep_now) or any view method on the same thread,
    /// which lock the store again and would deadlock. Prefer
    /// [`with_store`](Self::with_store) for anything longer than one call.
    pub fn store(&self) -> MutexGuard<'_, S> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` with the store locked, releasing the lock before returning.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.store())
    }

    pub fn engine(&self) -> &SpotEngine {
        &self.engine
    }

    /// When the last sweep ran (epoch millis).
    pub fn last_sweep(&self) -> Option<u64> {
        *self.last_sweep.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether a sweep is due at `now`.
    pub fn sweep_due(&self, now: u64) -> bool {
        interval_elapsed(self.last_sweep(), now, self.engine.config().sweep_interval_secs)
    }

    /// When a view was last computed (epoch millis).
    pub fn last_refresh(&self) -> Option<u64> {
        *self.last_refresh.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether the refresh interval has passed since the last view.
    pub fn refresh_due(&self, now: u64) -> bool {
        interval_elapsed(
            self.last_refresh(),
            now,
            self.engine.config().refresh_interval_secs,
        )
    }

    /// Poll entry point: recompute the view only when a refresh is due.
    pub fn refresh(&self, now: u64, request: &ViewRequest) -> Option<Vec<Spot>> {
        if !self.refresh_due(now) {
            return None;
        }
        Some(self.view(now, request))
    }

    /// Periodic entry point. Idempotent, and skipped if a tick is in flight.
    pub fn tick(&self, now: u64) -> TickOutcome {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            log::debug!("Tick at {} skipped, previous tick still running", now);
            return TickOutcome::Skipped;
        }
        let _guard = InFlight(&self.in_flight);

        if !self.sweep_due(now) {
            return TickOutcome::NotDue;
        }
        TickOutcome::Swept {
            removed: self.sweep_now(now),
        }
    }

    /// Purge expired posts from the store immediately.
    pub fn sweep_now(&self, now: u64) -> Vec<String> {
        let removed = self.store().purge_expired(now);
        *self.last_sweep.lock().unwrap_or_else(|e| e.into_inner()) = Some(now);
        if !removed.is_empty() {
            log::info!("Expiry sweep removed {} posts", removed.len());
        }
        removed
    }

    /// Compute a view of the current store contents and record the refresh.
    pub fn view(&self, now: u64, request: &ViewRequest) -> Vec<Spot> {
        let posts = self.store().posts();
        *self.last_refresh.lock().unwrap_or_else(|e| e.into_inner()) = Some(now);
        self.engine.view(&posts, now, request)
    }

    /// Consume the feed and return the store.
    pub fn into_store(self) -> S {
        self.store.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

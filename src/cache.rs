/// Bounded profile cache with sliding expiration and single-flight loading
///
/// Keyed by username. Entries hold either a resolved profile or an explicit
/// not-found marker, so known-absent users do not hit the directory on every
/// lookup. Capacity overflow evicts the least recently accessed entry, and
/// every access resets an entry's expiration clock.
use crate::error::UserDirResult;
use crate::metrics;
use crate::profile::Resolution;
use indexmap::IndexMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

/// Maximum number of cached usernames.
pub const MAX_ENTRIES: usize = 100;

/// Sliding expiration window: 14 days, reset on every access.
pub const SLIDING_TTL: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// One cached key. The cell is shared with in-flight waiters, so evicting a
/// slot mid-load never tears the load out from under them.
struct Slot {
    cell: Arc<OnceCell<Resolution>>,
    last_accessed: Instant,
}

/// In-memory username -> resolution cache.
///
/// Recency order lives in the map itself: entries sit in access order, the
/// front being the eviction candidate. The map lock covers bookkeeping only;
/// directory loads run outside it, so lookups of different keys never
/// serialize on each other.
pub struct ProfileCache {
    slots: Mutex<IndexMap<String, Slot>>,
    max_entries: usize,
    ttl: Duration,
}

impl ProfileCache {
    /// Create a cache with the standard bounds (100 entries, 14-day window).
    pub fn new() -> Self {
        Self::with_capacity_and_ttl(MAX_ENTRIES, SLIDING_TTL)
    }

    /// Create a cache with custom bounds.
    pub fn with_capacity_and_ttl(max_entries: usize, ttl: Duration) -> Self {
        Self {
            slots: Mutex::new(IndexMap::new()),
            max_entries,
            ttl,
        }
    }

    /// Look up `username`, invoking `load` on a miss.
    ///
    /// The loaded resolution, found or not-found alike, is stored under the
    /// key. Concurrent callers for the same key share one in-flight load. A
    /// load error removes the entry so the next call retries the directory.
    pub async fn get_or_load<F, Fut>(&self, username: &str, load: F) -> UserDirResult<Resolution>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = UserDirResult<Resolution>>,
    {
        let cell = self.slot_for(username).await;

        match cell.get_or_try_init(load).await {
            Ok(resolution) => Ok(resolution.clone()),
            Err(e) => {
                self.remove_if_unresolved(username, &cell).await;
                Err(e)
            }
        }
    }

    /// Fetch or create the slot for `username`, refreshing its expiration
    /// clock and moving it to the most-recent position.
    async fn slot_for(&self, username: &str) -> Arc<OnceCell<Resolution>> {
        let mut slots = self.slots.lock().await;
        let now = Instant::now();

        // Expired entries are dropped rather than served stale.
        let expired = slots
            .get(username)
            .map(|slot| now.duration_since(slot.last_accessed) > self.ttl)
            .unwrap_or(false);
        if expired {
            slots.shift_remove(username);
            debug!(username, "cache entry expired");
        }

        if let Some((index, _, slot)) = slots.get_full_mut(username) {
            slot.last_accessed = now;
            let cell = Arc::clone(&slot.cell);
            let most_recent = slots.len() - 1;
            slots.move_index(index, most_recent);
            metrics::CACHE_HITS_TOTAL
                .with_label_values(&["profile"])
                .inc();
            debug!(username, "cache hit");
            return cell;
        }

        let cell = Arc::new(OnceCell::new());
        slots.insert(
            username.to_string(),
            Slot {
                cell: Arc::clone(&cell),
                last_accessed: now,
            },
        );

        // LRU eviction, independent of the evictee's remaining time to live.
        while slots.len() > self.max_entries {
            if let Some((evicted, _)) = slots.shift_remove_index(0) {
                debug!(username = %evicted, "evicted least recently accessed entry");
            }
        }

        metrics::CACHE_MISSES_TOTAL
            .with_label_values(&["profile"])
            .inc();
        metrics::CACHE_SIZE.set(slots.len() as i64);
        debug!(username, "cache miss");
        cell
    }

    /// Remove the entry for `username` if it still holds this exact cell and
    /// the load never resolved. A concurrent caller may have replaced the
    /// slot or completed its own load in the meantime; that result stays.
    async fn remove_if_unresolved(&self, username: &str, cell: &Arc<OnceCell<Resolution>>) {
        let mut slots = self.slots.lock().await;

        let failed_slot = slots
            .get(username)
            .map(|slot| Arc::ptr_eq(&slot.cell, cell) && slot.cell.get().is_none())
            .unwrap_or(false);

        if failed_slot {
            slots.shift_remove(username);
            metrics::CACHE_SIZE.set(slots.len() as i64);
        }
    }

    /// Drop a single entry so the next lookup reloads from the directory.
    pub async fn invalidate(&self, username: &str) {
        let mut slots = self.slots.lock().await;
        slots.shift_remove(username);
        metrics::CACHE_SIZE.set(slots.len() as i64);
    }

    /// Remove all entries unaccessed past the sliding window.
    pub async fn purge_expired(&self) {
        let mut slots = self.slots.lock().await;
        let now = Instant::now();
        slots.retain(|_, slot| now.duration_since(slot.last_accessed) <= self.ttl);
        metrics::CACHE_SIZE.set(slots.len() as i64);
    }

    /// Number of live entries, including loads still in flight.
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.lock().await.is_empty()
    }
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::new()
    }
}

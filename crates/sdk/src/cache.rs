//! Shared TTL cache for warps, registry entries and brands.
//!
//! One store backs every logical domain; keys are namespaced through
//! [`CacheKey`] so a hash used as a warp key never collides with the same
//! hash used as a registry key. Expired entries are evicted lazily on `get`
//! and proactively by a background sweep.

use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant};
use tracing::{debug, info};

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Expiry horizon for TTLs too large to add to the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Namespaced cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn warp(hash: &str) -> Self {
        Self(format!("warp:{hash}"))
    }

    pub fn registry(hash_or_alias: &str) -> Self {
        Self(format!("registry:{hash_or_alias}"))
    }

    pub fn brand(key: &str) -> Self {
        Self(format!("brand:{key}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

type Entries = RwLock<HashMap<CacheKey, CacheEntry>>;

struct Sweeper {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Keyed store with per-entry expiry.
///
/// Values are stored type-erased and handed back as clones, so callers never
/// hold a reference into cached state. Every `set` replaces the prior entry.
pub struct WarpCache {
    entries: Arc<Entries>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl WarpCache {
    /// Create a cache; the sweep task starts when called inside a tokio runtime.
    pub fn new() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }

    pub fn with_sweep_interval(every: Duration) -> Self {
        let entries = Arc::new(RwLock::new(HashMap::new()));
        let sweeper = tokio::runtime::Handle::try_current()
            .ok()
            .map(|runtime| spawn_sweeper(&runtime, Arc::downgrade(&entries), every));

        Self {
            entries,
            sweeper: Mutex::new(sweeper),
        }
    }

    /// Fetch a live entry, evicting it if it has expired.
    pub fn get<T>(&self, key: &CacheKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => {
                    debug!(key = %key, "cache miss");
                    return None;
                }
                Some(entry) if !entry.is_expired(now) => {
                    debug!(key = %key, "cache hit");
                    return entry.value.downcast_ref::<T>().cloned();
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
            debug!(key = %key, "evicted expired cache entry");
        }
        None
    }

    /// Store `value` for `ttl`. A zero TTL stores an entry that is already expired.
    pub fn set<T>(&self, key: CacheKey, value: T, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        let now = Instant::now();
        let entry = CacheEntry {
            value: Arc::new(value),
            expires_at: now.checked_add(ttl).unwrap_or(now + FAR_FUTURE),
        };
        debug!(key = %key, ttl_secs = ttl.as_secs(), "cache set");
        self.entries.write().insert(key, entry);
    }

    pub fn delete(&self, key: &CacheKey) {
        self.entries.write().remove(key);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every expired entry now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        purge(&self.entries, Instant::now())
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeper.lock().is_some()
    }

    /// Stop the sweep task and wait for it to finish.
    pub async fn shutdown(&self) {
        let sweeper = self.sweeper.lock().take();
        if let Some(Sweeper { stop, handle }) = sweeper {
            let _ = stop.send(());
            let _ = handle.await;
            debug!("cache sweeper stopped");
        }
    }
}

impl Default for WarpCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WarpCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WarpCache")
            .field("entries", &self.len())
            .field("sweeping", &self.is_sweeping())
            .finish()
    }
}

impl Drop for WarpCache {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.get_mut().take() {
            sweeper.handle.abort();
        }
    }
}

fn purge(entries: &Entries, now: Instant) -> usize {
    let expired: Vec<CacheKey> = entries
        .read()
        .iter()
        .filter(|(_, entry)| entry.is_expired(now))
        .map(|(key, _)| key.clone())
        .collect();

    if expired.is_empty() {
        return 0;
    }

    let mut guard = entries.write();
    let mut removed = 0;
    for key in expired {
        // Re-check: the entry may have been replaced since the read pass.
        if guard.get(&key).is_some_and(|entry| entry.is_expired(now)) {
            guard.remove(&key);
            removed += 1;
        }
    }
    removed
}

fn spawn_sweeper(
    runtime: &tokio::runtime::Handle,
    entries: Weak<Entries>,
    every: Duration,
) -> Sweeper {
    let (stop, mut stopped) = oneshot::channel();

    let handle = runtime.spawn(async move {
        let mut ticker = interval(every);
        loop {
            tokio::select! {
                _ = &mut stopped => break,
                _ = ticker.tick() => {
                    let Some(entries) = entries.upgrade() else { break };
                    let removed = purge(&entries, Instant::now());
                    if removed > 0 {
                        info!(removed, "swept expired cache entries");
                    }
                }
            }
        }
    });

    Sweeper { stop, handle }
}

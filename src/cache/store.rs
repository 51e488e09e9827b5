// In-memory response cache.
// Stores decoded API responses by key with a freshness deadline; nothing survives the process.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{CakewalkError, Result};

use super::clock::{Clock, SystemClock};
use super::key::CacheKey;

/// A cached value and its freshness deadline.
struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    /// The value is served only while `now < expires_at`.
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new<V: Send + Sync + 'static>(value: V, now: DateTime<Utc>, ttl: TimeDelta) -> Self {
        Self {
            value: Arc::new(value),
            // Deadlines past chrono's range never expire.
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Per-client map of cache keys to decoded responses.
///
/// Expired entries are not purged proactively; they are overwritten by the next
/// successful fetch or dropped by [`ResponseCache::remove`] and
/// [`ResponseCache::clear`].
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create a cache using the system clock.
    pub fn new(ttl: Duration) -> Result<Self> {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache reading time from `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|_| CakewalkError::Config(format!("cache TTL {:?} is out of range", ttl)))?;
        Ok(Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        })
    }

    /// Swap the time source. Existing deadlines are kept as stored.
    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return a clone of the fresh value stored under `key`.
    ///
    /// A missing entry, an expired entry, and an entry of another type are all misses.
    pub fn get<V: Clone + 'static>(&self, key: &CacheKey) -> Option<V> {
        let now = self.clock.now();
        let entries = self.lock();
        let entry = entries.get(key)?;
        if !entry.is_fresh(now) {
            return None;
        }
        entry.value.downcast_ref::<V>().cloned()
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn insert<V: Send + Sync + 'static>(&self, key: CacheKey, value: V) {
        let entry = CacheEntry::new(value, self.clock.now(), self.ttl);
        self.lock().insert(key, entry);
    }

    pub fn contains_fresh(&self, key: &CacheKey) -> bool {
        let now = self.clock.now();
        self.lock().get(key).is_some_and(|entry| entry.is_fresh(now))
    }

    /// Remove one entry. Returns whether an entry was present.
    pub fn remove(&self, key: &CacheKey) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Keys of all stored entries, fresh or expired, in no particular order.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.lock().keys().cloned().collect()
    }
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.len())
            .field("ttl", &self.ttl)
            .field("clock", &self.clock)
            .finish()
    }
}

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_ms: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ms: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

/// A thread-safe cache with TTL support.
pub struct Cache<V> {
    data: DashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V: Clone> Cache<V> {
    /// Create a new cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            data: DashMap::new(),
            default_ttl,
            clock,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Get a value from the cache. Expired entries are dropped on read.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > self.clock.now() {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    /// Set a value in the cache with the default TTL.
    pub fn set(&self, key: String, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: String, value: V, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.data.insert(key, CacheEntry { value, expires_at });
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        self.data.remove(key).map(|(_, entry)| entry.value)
    }

    pub fn clear(&self) {
        self.data.clear();
    }

    /// Remove all expired entries, returning how many were dropped.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let before = self.data.len();
        self.data.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.data.len())
    }

    /// Number of entries, including expired ones not yet cleaned up.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

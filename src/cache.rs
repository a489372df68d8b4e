//! Bounded concurrent content cache.
//!
//! [`ContentCache`] keeps raw byte payloads under a fixed byte budget with
//! least-recently-used eviction and a sliding time-to-live: every hit
//! refreshes both the entry's recency and its expiry clock, so only entries
//! that go unread for a full TTL window expire. Expired entries are reaped
//! lazily by the `get` that finds them.
//!
//! Writes are serialized cache-wide so the budget accounting stays exact.
//! Reads only contend per key: each key gets its own lock the first time it
//! is written, and a key that never had one is an instant miss without any
//! locking. Key locks are never removed, so long-lived caches fed unbounded
//! key sets will grow the lock registry; keep key cardinality bounded.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, warn};

/// Default byte budget: 5 MB.
pub const DEFAULT_CAPACITY_BYTES: usize = 5 * 1000 * 1000;

/// Default sliding time-to-live: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Recency stamp. The instant doubles as the TTL origin; the sequence number
/// breaks ties between entries stamped within the same clock tick.
type Stamp = (Instant, u64);

struct CacheEntry {
    payload: Arc<[u8]>,
    stamp: Stamp,
}

/// Byte-budgeted LRU cache with sliding TTL.
pub struct ContentCache {
    entries: DashMap<String, CacheEntry>,
    /// Recency queue: oldest stamp first. Guarded separately from the entry
    /// map so reads for different keys never serialize on it for long.
    order: Mutex<BTreeMap<Stamp, String>>,
    key_locks: DashMap<String, Arc<Mutex<()>>>,
    write_lock: Mutex<()>,
    occupied: AtomicUsize,
    sequence: AtomicU64,
    capacity: usize,
    ttl: Duration,
}

impl ContentCache {
    /// Create a cache with the default capacity and TTL.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for the cache.
    pub fn builder() -> ContentCacheBuilder {
        ContentCacheBuilder {
            capacity: DEFAULT_CAPACITY_BYTES,
            ttl: DEFAULT_TTL,
        }
    }

    /// Insert or replace the payload for `key`.
    ///
    /// Payloads larger than the whole cache budget are not cached; the call
    /// is a silent no-op apart from a log line. Replacing an existing entry
    /// releases its budget before the new size is charged. Older entries are
    /// evicted in recency order until the new payload fits.
    pub fn put(&self, key: &str, payload: Vec<u8>) {
        let _write = self.write_lock.lock().expect("cache write lock poisoned");
        let key_lock = Arc::clone(
            self.key_locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        let _key = key_lock.lock().expect("cache key lock poisoned");

        let size = payload.len();
        if size > self.capacity {
            warn!(
                key,
                size,
                capacity = self.capacity,
                "payload exceeds cache capacity, not cached"
            );
            return;
        }

        let mut order = self.order.lock().expect("cache order lock poisoned");

        if let Some((_, old)) = self.entries.remove(key) {
            order.remove(&old.stamp);
            self.occupied.fetch_sub(old.payload.len(), Ordering::SeqCst);
            debug!(key, "replacing cached entry");
        }

        while self.occupied.load(Ordering::SeqCst) + size > self.capacity {
            let Some((_, victim)) = order.pop_first() else {
                break;
            };
            if let Some((_, evicted)) = self.entries.remove(&victim) {
                self.occupied
                    .fetch_sub(evicted.payload.len(), Ordering::SeqCst);
                debug!(key = %victim, "evicted least recently used entry");
            }
        }

        let stamp = (Instant::now(), self.sequence.fetch_add(1, Ordering::SeqCst));
        order.insert(stamp, key.to_string());
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                payload: payload.into(),
                stamp,
            },
        );
        self.occupied.fetch_add(size, Ordering::SeqCst);
    }

    /// Look up the payload for `key`.
    ///
    /// A hit refreshes the entry's recency and restarts its TTL window. An
    /// entry that outlived the TTL since its last touch is removed and
    /// reported as a miss.
    pub fn get(&self, key: &str) -> Option<Arc<[u8]>> {
        // A key that was never written has no lock: miss without locking.
        let key_lock = Arc::clone(self.key_locks.get(key)?.value());
        let _key = key_lock.lock().expect("cache key lock poisoned");
        let mut order = self.order.lock().expect("cache order lock poisoned");

        let now = Instant::now();
        {
            let Some(mut entry) = self.entries.get_mut(key) else {
                debug!(key, "cache miss");
                return None;
            };
            order.remove(&entry.stamp);
            if now.duration_since(entry.stamp.0) < self.ttl {
                let stamp = (now, self.sequence.fetch_add(1, Ordering::SeqCst));
                entry.stamp = stamp;
                order.insert(stamp, key.to_string());
                debug!(key, "cache hit");
                return Some(Arc::clone(&entry.payload));
            }
        }

        if let Some((_, expired)) = self.entries.remove(key) {
            self.occupied
                .fetch_sub(expired.payload.len(), Ordering::SeqCst);
        }
        warn!(key, "cached entry expired");
        None
    }

    /// Number of cached entries, expired-but-unreaped ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes currently charged against the budget.
    pub fn occupied_bytes(&self) -> usize {
        self.occupied.load(Ordering::SeqCst)
    }

    /// The configured byte budget.
    pub fn capacity_bytes(&self) -> usize {
        self.capacity
    }

    /// The configured sliding time-to-live.
    pub fn time_to_live(&self) -> Duration {
        self.ttl
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ContentCache`].
pub struct ContentCacheBuilder {
    capacity: usize,
    ttl: Duration,
}

impl ContentCacheBuilder {
    /// Set the byte budget.
    pub fn capacity_bytes(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the sliding time-to-live.
    pub fn time_to_live(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Finish the cache.
    pub fn build(self) -> ContentCache {
        ContentCache {
            entries: DashMap::new(),
            order: Mutex::new(BTreeMap::new()),
            key_locks: DashMap::new(),
            write_lock: Mutex::new(()),
            occupied: AtomicUsize::new(0),
            sequence: AtomicU64::new(0),
            capacity: self.capacity,
            ttl: self.ttl,
        }
    }
}

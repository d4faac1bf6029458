use dashmap::DashMap;
use ndns_domain::{Name, PublicKey};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
struct KeyEntry {
    key: PublicKey,
    expires_at: Instant,
}

/// Keys whose certificate chain has been verified
///
/// Exact-name lookups; expired entries are dropped when looked up. When an
/// insert would exceed `capacity` the whole table is cleared first.
pub struct TrustedKeyCache {
    entries: DashMap<Name, KeyEntry>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    clears: AtomicU64,
}

impl TrustedKeyCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            clears: AtomicU64::new(0),
        }
    }

    /// Unexpired key stored under `name`
    pub fn get(&self, name: &Name) -> Option<PublicKey> {
        if let Some(entry) = self.entries.get(name) {
            if entry.expires_at > Instant::now() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(name = %name, "Trusted key cache hit");
                return Some(entry.key.clone());
            }

            drop(entry);
            self.entries.remove(name);
            debug!(name = %name, "Trusted key expired");
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn insert(&self, name: Name, key: PublicKey, freshness: Duration) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&name) {
            self.entries.clear();
            self.clears.fetch_add(1, Ordering::Relaxed);
            debug!(capacity = self.capacity, "Trusted key cache full, cleared");
        }

        trace!(name = %name, freshness_secs = freshness.as_secs(), "Caching trusted key");

        self.entries.insert(
            name,
            KeyEntry {
                key,
                expires_at: Instant::now() + freshness,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> KeyCacheStats {
        KeyCacheStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of trusted key cache counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub clears: u64,
}

use dashmap::DashMap;
use ndns_domain::{RecordSetMessage, SignedObject};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::Instant;
use tracing::{debug, trace};

/// Cached answer with its expiry
#[derive(Debug, Clone)]
pub struct AnswerEntry {
    pub(super) object: SignedObject,
    pub(super) answer: Option<RecordSetMessage>,
    pub(super) verified: bool,
    pub(super) expires_at: Instant,
}

impl AnswerEntry {
    /// Entry that lives for the object's freshness period
    pub fn new(object: SignedObject, answer: Option<RecordSetMessage>, verified: bool) -> Self {
        let expires_at = Instant::now() + object.freshness();
        Self {
            object,
            answer,
            verified,
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// What a lookup hands back
#[derive(Debug, Clone)]
pub struct CachedAnswer {
    pub object: SignedObject,
    pub answer: Option<RecordSetMessage>,
    /// Whether the object passed the trust verifier before it was stored
    pub verified: bool,
}

/// One keyed table of answers with lazy expiry
pub struct CacheTable<K> {
    table: &'static str,
    entries: DashMap<K, AnswerEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K> CacheTable<K>
where
    K: Eq + Hash + Debug,
{
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Unexpired entry for `key`; an expired one is evicted
    pub fn get(&self, key: &K) -> Option<CachedAnswer> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(table = self.table, key = ?key, "Query cache hit");
                return Some(CachedAnswer {
                    object: entry.object.clone(),
                    answer: entry.answer.clone(),
                    verified: entry.verified,
                });
            }

            drop(entry);
            self.entries.remove(key);
            debug!(table = self.table, key = ?key, "Query cache entry expired");
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn insert(
        &self,
        key: K,
        object: SignedObject,
        answer: Option<RecordSetMessage>,
        verified: bool,
    ) {
        trace!(
            table = self.table,
            key = ?key,
            freshness_secs = object.freshness_seconds,
            verified = verified,
            "Caching answer"
        );
        self.entries
            .insert(key, AnswerEntry::new(object, answer, verified));
    }

    /// Record that a cached object has since passed verification
    pub fn mark_verified(&self, key: &K) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.verified = true;
        }
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

    pub fn stats(&self) -> TableStats {
        TableStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

use super::entries::{CacheTable, TableStats};
use ndns_domain::{Name, RecordType};

/// Answers memoized at three granularities
///
/// - `named`: final answers by (name, record type)
/// - `zone_hints`: forwarding-hint answers by zone name
/// - `raw`: single network queries by the exact name sent on the wire
pub struct QueryCache {
    named: CacheTable<(Name, RecordType)>,
    zone_hints: CacheTable<Name>,
    raw: CacheTable<Name>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            named: CacheTable::new("named"),
            zone_hints: CacheTable::new("zone_hints"),
            raw: CacheTable::new("raw"),
        }
    }

    pub fn named(&self) -> &CacheTable<(Name, RecordType)> {
        &self.named
    }

    pub fn zone_hints(&self) -> &CacheTable<Name> {
        &self.zone_hints
    }

    pub fn raw(&self) -> &CacheTable<Name> {
        &self.raw
    }

    pub fn clear(&self) {
        self.named.clear();
        self.zone_hints.clear();
        self.raw.clear();
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            named: self.named.stats(),
            zone_hints: self.zone_hints.stats(),
            raw: self.raw.stats(),
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of query cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub named: TableStats,
    pub zone_hints: TableStats,
    pub raw: TableStats,
}

impl CacheStatsSnapshot {
    pub fn total_hits(&self) -> u64 {
        self.named.hits + self.zone_hints.hits + self.raw.hits
    }

    pub fn total_misses(&self) -> u64 {
        self.named.misses + self.zone_hints.misses + self.raw.misses
    }

    /// Hit percentage across all tables
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_hits() + self.total_misses();
        if total == 0 {
            return 0.0;
        }
        (self.total_hits() as f64 / total as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use ndns_domain::{ContentType, SignedObject};

    #[tokio::test]
    async fn test_tables_are_independent() {
        let cache = QueryCache::new();
        let name = Name::parse("/ndn").unwrap();
        let object = SignedObject {
            name: name.clone(),
            content: Bytes::new(),
            content_type: ContentType::Data,
            freshness_seconds: 60,
            key_locator: None,
            signature: Bytes::new(),
        };

        cache.zone_hints().insert(name.clone(), object, None, true);

        assert!(cache.zone_hints().get(&name).is_some());
        assert!(cache.raw().get(&name).is_none());
        assert!(cache.named().get(&(name, RecordType::FH)).is_none());

        let stats = cache.stats();
        assert_eq!(stats.total_hits(), 1);
        assert_eq!(stats.total_misses(), 2);
        assert!((stats.hit_rate() - 100.0 / 3.0).abs() < 1e-9);

        cache.clear();
        assert_eq!(cache.stats().zone_hints.entries, 0);
    }
}

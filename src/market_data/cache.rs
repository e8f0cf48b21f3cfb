use std::time::{Duration, Instant};

use tracing::debug;

use super::types::MarketSnapshot;

struct CacheEntry {
    key: Vec<String>,
    snapshot: MarketSnapshot,
    fetched_at: Instant,
}

/// Time-bounded cache for the latest market snapshot, keyed by the
/// instrument symbol list it was fetched for.
pub struct SnapshotCache {
    entry: Option<CacheEntry>,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    /// Cached snapshot, if one exists for this key and is still fresh
    pub fn get(&self, key: &[String]) -> Option<&MarketSnapshot> {
        let entry = self.entry.as_ref()?;
        if entry.key != key || entry.fetched_at.elapsed() >= self.ttl {
            return None;
        }
        Some(&entry.snapshot)
    }

    pub fn store(&mut self, key: Vec<String>, snapshot: MarketSnapshot) {
        self.entry = Some(CacheEntry {
            key,
            snapshot,
            fetched_at: Instant::now(),
        });
    }

    /// Drop the cached snapshot so the next read refetches
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("Snapshot cache invalidated");
        }
    }
}

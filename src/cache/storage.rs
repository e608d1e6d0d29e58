//! In-memory response storage with per-entry expiry

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::time::Instant;

use super::key::ServiceQueryKey;

struct CacheEntry {
    /// `service.resource` of the query, for invalidation
    prefix: String,
    data: Value,
    cached_at: DateTime<Utc>,
    expires_at: Instant,
}

/// Cached responses keyed by [`ServiceQueryKey::cache_hash`]
#[derive(Default)]
pub struct ResponseStorage {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached data if present and not expired. Expired entries are dropped.
    pub fn get(&self, key: &ServiceQueryKey) -> Option<Value> {
        let hash = key.cache_hash();
        let mut entries = self.entries.lock().ok()?;

        match entries.get(&hash) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.data.clone()),
            Some(_) => {
                entries.remove(&hash);
                None
            }
            None => None,
        }
    }

    /// Store data with TTL
    pub fn put(&self, key: &ServiceQueryKey, data: Value, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.cache_hash(),
                CacheEntry {
                    prefix: key.resource_prefix(),
                    data,
                    cached_at: Utc::now(),
                    expires_at: Instant::now() + ttl,
                },
            );
        }
    }

    /// Drop every entry of `service.resource`. Returns the number removed.
    pub fn invalidate(&self, service: &str, resource: &str) -> usize {
        let prefix = format!("{}.{}", service, resource);
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|_, entry| entry.prefix != prefix);
        before - entries.len()
    }

    /// Clear all cache entries
    pub fn clear_all(&self) -> usize {
        self.entries
            .lock()
            .map(|mut entries| entries.drain().count())
            .unwrap_or(0)
    }

    pub fn stats(&self) -> CacheStats {
        let Ok(entries) = self.entries.lock() else {
            return CacheStats::default();
        };
        let now = Instant::now();
        let valid_entries = entries.values().filter(|e| e.expires_at > now).count();

        CacheStats {
            total_entries: entries.len(),
            valid_entries,
            expired_entries: entries.len() - valid_entries,
            oldest_entry: entries.values().map(|e| e.cached_at).min(),
            newest_entry: entries.values().map(|e| e.cached_at).max(),
        }
    }
}

/// Statistics about cache state
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

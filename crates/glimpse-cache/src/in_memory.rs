use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use glimpse_core::{GlimpseError, ResponseCache};
use serde_json::Value;
use tokio::sync::RwLock;

/// Entries older than this are treated as absent.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

struct CacheEntry {
    payload: Value,
    stored_at: Instant,
}

/// In-memory response cache keyed by request fingerprint.
///
/// Expired entries are not evicted, only reported as misses; over a long
/// uptime the map grows without bound (accepted limitation).
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl InMemoryCache {
    /// Create a cache with the standard 30-minute TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache where entries expire after the given duration.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            ttl,
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, GlimpseError> {
        let store = self.store.read().await;
        match store.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                Ok(Some(entry.payload.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn put(&self, key: &str, payload: &Value) -> Result<(), GlimpseError> {
        let mut store = self.store.write().await;
        store.insert(
            key.to_string(),
            CacheEntry {
                payload: payload.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), GlimpseError> {
        let mut store = self.store.write().await;
        store.clear();
        Ok(())
    }
}

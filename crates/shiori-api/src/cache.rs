//! Small TTL cache over catalog responses.
//!
//! The remote data changes slowly, so each endpoint class gets its own
//! freshness window: listings for minutes, details a bit longer, the
//! genre index for an hour. Entries are evicted lazily on lookup.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::Instant;

/// Endpoint class, determining how long a response stays fresh.
#[derive(Debug, Clone, Copy)]
pub enum CacheKind {
    List,
    Detail,
    Genres,
}

impl CacheKind {
    fn ttl(self) -> Duration {
        match self {
            Self::List => Duration::from_secs(5 * 60),
            Self::Detail => Duration::from_secs(10 * 60),
            Self::Genres => Duration::from_secs(60 * 60),
        }
    }
}

struct CacheEntry {
    expires_at: Instant,
    value: serde_json::Value,
}

/// Keyed response cache. Values are stored as JSON trees so one cache
/// serves every response type.
#[derive(Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a fresh entry, evicting it if expired.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                serde_json::from_value(entry.value.clone()).ok()
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a response. Serialization failures just skip the cache.
    pub fn put<T: Serialize>(&self, kind: CacheKind, key: String, value: &T) {
        let Ok(value) = serde_json::to_value(value) else {
            return;
        };
        let entry = CacheEntry {
            expires_at: Instant::now() + kind.ttl(),
            value,
        };
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(key, entry);
    }
}

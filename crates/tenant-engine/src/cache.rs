//! TTL-bounded config cache over session storage
//!
//! Keyed `tenant_config_{code}`, value = serialized [`CacheEntry`].
//! Expiry is lazy: an expired or corrupt entry is deleted on the next
//! lookup and reported as a miss. Storage failures are never fatal; the
//! cache degrades to always-miss and the caller refetches.

use crate::config::{CacheEntry, TenantConfig};
use std::sync::Arc;
use tenant_common::{epoch_ms, SessionStore};
use tracing::{debug, warn};

/// Storage key prefix for cache entries
pub const CACHE_KEY_PREFIX: &str = "tenant_config_";

/// Default entry lifetime: 24 hours
pub const DEFAULT_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// TTL cache for resolved tenant configs
pub struct ConfigCache {
    store: Arc<dyn SessionStore>,
}

impl ConfigCache {
    /// Cache over the given session store
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    fn key(code: &str) -> String {
        format!("{CACHE_KEY_PREFIX}{code}")
    }

    /// Look up a tenant's cached config, honoring `ttl_ms`.
    ///
    /// Expired and corrupt entries are removed and reported as misses.
    pub fn get(&self, code: &str, ttl_ms: i64) -> Option<TenantConfig> {
        let key = Self::key(code);
        let raw = match self.store.get_item(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(tenant = code, error = %e, "cache storage unavailable, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(tenant = code, error = %e, "corrupt cache entry, removing");
                self.remove(&key);
                return None;
            }
        };

        if epoch_ms() - entry.timestamp >= ttl_ms {
            debug!(tenant = code, "cache entry expired");
            self.remove(&key);
            return None;
        }

        debug!(tenant = code, "cache hit");
        Some(entry.data)
    }

    /// Store a tenant's config, stamping the current time.
    ///
    /// Overwrites any existing entry unconditionally.
    pub fn put(&self, code: &str, data: &TenantConfig) {
        let entry = CacheEntry {
            data: data.clone(),
            timestamp: epoch_ms(),
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(tenant = code, error = %e, "failed to serialize cache entry");
                return;
            }
        };
        if let Err(e) = self.store.set_item(&Self::key(code), &raw) {
            warn!(tenant = code, error = %e, "failed to persist cache entry");
        }
    }

    /// Drop one tenant's entry, or every entry when `code` is `None`
    pub fn invalidate(&self, code: Option<&str>) {
        match code {
            Some(code) => self.remove(&Self::key(code)),
            None => {
                let keys = match self.store.keys() {
                    Ok(keys) => keys,
                    Err(e) => {
                        warn!(error = %e, "cache storage unavailable, nothing to invalidate");
                        return;
                    }
                };
                for key in keys {
                    if key.starts_with(CACHE_KEY_PREFIX) {
                        self.remove(&key);
                    }
                }
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove_item(key) {
            warn!(key, error = %e, "failed to remove cache entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenant_common::MemorySessionStore;

    fn cache_with_store() -> (ConfigCache, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        (ConfigCache::new(store.clone()), store)
    }

    fn config(title: &str) -> TenantConfig {
        TenantConfig::new().with("title", title)
    }

    #[test]
    fn test_put_get_round_trip() {
        let (cache, _store) = cache_with_store();
        cache.put("TenantX", &config("A"));

        let hit = cache.get("TenantX", DEFAULT_TTL_MS).unwrap();
        assert_eq!(hit.get_str("title"), Some("A"));
    }

    #[test]
    fn test_expired_entry_is_miss_and_deleted() {
        let (cache, store) = cache_with_store();
        let stale = CacheEntry {
            data: config("A"),
            timestamp: epoch_ms() - DEFAULT_TTL_MS - 1,
        };
        store
            .set_item(
                "tenant_config_TenantX",
                &serde_json::to_string(&stale).unwrap(),
            )
            .unwrap();

        assert!(cache.get("TenantX", DEFAULT_TTL_MS).is_none());
        assert_eq!(store.get_item("tenant_config_TenantX").unwrap(), None);
    }

    #[test]
    fn test_ttl_override_per_lookup() {
        let (cache, _store) = cache_with_store();
        cache.put("TenantX", &config("A"));

        assert!(cache.get("TenantX", DEFAULT_TTL_MS).is_some());
        // a zero TTL treats even a fresh write as expired
        assert!(cache.get("TenantX", 0).is_none());
    }

    #[test]
    fn test_corrupt_entry_is_miss_and_deleted() {
        let (cache, store) = cache_with_store();
        store
            .set_item("tenant_config_TenantX", "{not json")
            .unwrap();

        assert!(cache.get("TenantX", DEFAULT_TTL_MS).is_none());
        assert_eq!(store.get_item("tenant_config_TenantX").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let (cache, _store) = cache_with_store();
        cache.put("TenantX", &config("A"));
        cache.put("TenantX", &config("B"));

        let hit = cache.get("TenantX", DEFAULT_TTL_MS).unwrap();
        assert_eq!(hit.get_str("title"), Some("B"));
    }

    #[test]
    fn test_invalidate_one_and_all() {
        let (cache, store) = cache_with_store();
        cache.put("TenantX", &config("A"));
        cache.put("TenantY", &config("B"));
        store.set_item("unrelated", "keep me").unwrap();

        cache.invalidate(Some("TenantX"));
        assert!(cache.get("TenantX", DEFAULT_TTL_MS).is_none());
        assert!(cache.get("TenantY", DEFAULT_TTL_MS).is_some());

        cache.invalidate(None);
        assert!(cache.get("TenantY", DEFAULT_TTL_MS).is_none());
        // non-cache keys survive a full invalidation
        assert_eq!(
            store.get_item("unrelated").unwrap().as_deref(),
            Some("keep me")
        );
    }
}

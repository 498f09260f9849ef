//! Read-through cache of catalog capability resolutions.
//!
//! The cache holds only immutable catalog rows (name pair → identifiers),
//! never principal-scoped data, so grant mutations need no invalidation.
//! Catalog mutations must call [`CatalogCache::invalidate`] (or
//! [`CatalogCache::invalidate_all`]) for the affected names. The backing
//! store stays the sole source of truth: a miss always falls through.

use moka::future::Cache;

use accesshub_core::config::CacheConfig;
use accesshub_core::types::Capability;

/// TTL-bounded capability resolution cache.
#[derive(Debug, Clone)]
pub struct CatalogCache {
    cache: Cache<(String, String), Capability>,
}

impl CatalogCache {
    /// Create a new catalog cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(std::time::Duration::from_secs(config.time_to_live_seconds))
            .build();
        Self { cache }
    }

    /// Look up a cached resolution.
    pub async fn get(&self, module_name: &str, action_name: &str) -> Option<Capability> {
        self.cache
            .get(&(module_name.to_string(), action_name.to_string()))
            .await
    }

    /// Record a resolution read from the store.
    pub async fn insert(&self, module_name: &str, action_name: &str, capability: Capability) {
        self.cache
            .insert(
                (module_name.to_string(), action_name.to_string()),
                capability,
            )
            .await;
    }

    /// Drop the cached resolution for one capability name pair.
    pub async fn invalidate(&self, module_name: &str, action_name: &str) {
        self.cache
            .invalidate(&(module_name.to_string(), action_name.to_string()))
            .await;
    }

    /// Drop every cached resolution.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accesshub_core::types::{ModuleId, PermissionId};

    fn capability() -> Capability {
        Capability {
            module_id: ModuleId::new(),
            permission_id: PermissionId::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = CatalogCache::new(&CacheConfig::default());
        let cap = capability();

        assert!(cache.get("article", "update").await.is_none());
        cache.insert("article", "update", cap).await;
        assert_eq!(cache.get("article", "update").await, Some(cap));
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = CatalogCache::new(&CacheConfig::default());
        cache.insert("article", "update", capability()).await;
        cache.insert("article", "read", capability()).await;

        cache.invalidate("article", "update").await;

        assert!(cache.get("article", "update").await.is_none());
        assert!(cache.get("article", "read").await.is_some());
    }
}

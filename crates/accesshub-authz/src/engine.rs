//! The authorization decision algorithm.
//!
//! Resolution order:
//! 1. Catalog — resolve (module, action) names to a permission id.
//! 2. Coarse grants — union of direct user grants and every assigned
//!    role's grants; a hit allows immediately without touching the
//!    object-level path.
//! 3. Object grants — only when a resource token was supplied: resolve
//!    the token against the resource registry's relation and check the
//!    exact (principal, resource, permission) triple.
//!
//! Coarse grants are cheap set-membership checks and are always evaluated
//! first; the resource-scoped path is only paid for when they do not
//! already satisfy the request.

use std::sync::Arc;

use tracing::debug;

use accesshub_core::error::AppError;
use accesshub_core::result::AppResult;
use accesshub_core::traits::DecisionStore;
use accesshub_core::types::{Capability, Decision, GrantSource, UserId};

use crate::cache::CatalogCache;

/// Produces allow/deny verdicts from an injected read-only store.
#[derive(Clone)]
pub struct DecisionEngine {
    /// Read-only view of catalog, grant, and resource relations.
    store: Arc<dyn DecisionStore>,
    /// Optional read-through cache of catalog resolutions.
    catalog_cache: Option<Arc<CatalogCache>>,
}

impl std::fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("cached", &self.catalog_cache.is_some())
            .finish()
    }
}

impl DecisionEngine {
    /// Create an engine without a catalog cache.
    pub fn new(store: Arc<dyn DecisionStore>) -> Self {
        Self {
            store,
            catalog_cache: None,
        }
    }

    /// Attach a read-through catalog cache.
    pub fn with_catalog_cache(mut self, cache: Arc<CatalogCache>) -> Self {
        self.catalog_cache = Some(cache);
        self
    }

    /// Evaluate one authorization check.
    ///
    /// A denial is a normal outcome (`Ok(Decision::Deny { .. })`);
    /// structural failures — unknown capability, an empty resource token —
    /// are errors.
    pub async fn authorize(
        &self,
        principal: UserId,
        module_name: &str,
        action_name: &str,
        resource_token: Option<&str>,
    ) -> AppResult<Decision> {
        if let Some(token) = resource_token {
            if token.is_empty() {
                return Err(AppError::missing_resource_token(format!(
                    "resource-scoped check of {module_name}:{action_name} \
                     requires a non-empty resource token"
                )));
            }
        }

        let capability = self
            .resolve_capability(module_name, action_name)
            .await?
            .ok_or_else(|| AppError::unknown_capability(module_name, action_name))?;

        // Coarse-grained union: direct grants plus every assigned role's
        // grants, short-circuiting as soon as the permission is found.
        let direct = self.store.direct_permission_ids(principal).await?;
        if direct.contains(&capability.permission_id) {
            debug!(%principal, module = module_name, action = action_name, "Allowed via direct grant");
            return Ok(Decision::Allow {
                source: GrantSource::Direct,
            });
        }

        for role_id in self.store.role_ids(principal).await? {
            let role_perms = self.store.role_permission_ids(role_id).await?;
            if role_perms.contains(&capability.permission_id) {
                debug!(%principal, %role_id, module = module_name, action = action_name, "Allowed via role grant");
                return Ok(Decision::Allow {
                    source: GrantSource::Role,
                });
            }
        }

        let Some(token) = resource_token else {
            return Ok(Decision::deny(module_name, action_name));
        };

        // Escalate to the object-level path. An entity that was never
        // registered cannot carry an object grant.
        let Some(resource_id) = self
            .store
            .lookup_resource(capability.module_id, token)
            .await?
        else {
            return Ok(Decision::deny(module_name, action_name));
        };

        if self
            .store
            .object_grant_exists(principal, resource_id, capability.permission_id)
            .await?
        {
            debug!(%principal, %resource_id, module = module_name, action = action_name, "Allowed via object grant");
            Ok(Decision::Allow {
                source: GrantSource::Object,
            })
        } else {
            Ok(Decision::deny(module_name, action_name))
        }
    }

    /// Evaluate a check and turn a denial into an `AccessDenied` error,
    /// for callers that enforce rather than inspect.
    pub async fn require(
        &self,
        principal: UserId,
        module_name: &str,
        action_name: &str,
        resource_token: Option<&str>,
    ) -> AppResult<GrantSource> {
        match self
            .authorize(principal, module_name, action_name, resource_token)
            .await?
        {
            Decision::Allow { source } => Ok(source),
            Decision::Deny { module, action } => Err(AppError::access_denied(&module, &action)),
        }
    }

    /// Resolve a capability through the cache when one is attached, else
    /// straight from the store. The store stays the source of truth; only
    /// positive resolutions are cached.
    async fn resolve_capability(
        &self,
        module_name: &str,
        action_name: &str,
    ) -> AppResult<Option<Capability>> {
        if let Some(cache) = &self.catalog_cache {
            if let Some(capability) = cache.get(module_name, action_name).await {
                return Ok(Some(capability));
            }
        }

        let resolved = self
            .store
            .resolve_capability(module_name, action_name)
            .await?;

        if let (Some(cache), Some(capability)) = (&self.catalog_cache, resolved) {
            cache.insert(module_name, action_name, capability).await;
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};

    use accesshub_core::config::CacheConfig;
    use accesshub_core::error::ErrorKind;
    use accesshub_core::types::{ModuleId, PermissionId, ResourceId, RoleId};

    /// In-memory grant relations for engine tests.
    #[derive(Default)]
    struct MemoryStore {
        capabilities: HashMap<(String, String), Capability>,
        direct: HashMap<UserId, HashSet<PermissionId>>,
        memberships: HashMap<UserId, HashSet<RoleId>>,
        role_grants: HashMap<RoleId, HashSet<PermissionId>>,
        resources: Mutex<HashMap<(ModuleId, String), ResourceId>>,
        object_grants: HashMap<(UserId, ResourceId, PermissionId), Option<DateTime<Utc>>>,
        resolve_calls: Mutex<u32>,
    }

    impl MemoryStore {
        fn define_capability(&mut self, module: &str, action: &str, module_id: ModuleId) -> Capability {
            let capability = Capability {
                module_id,
                permission_id: PermissionId::new(),
            };
            self.capabilities
                .insert((module.to_string(), action.to_string()), capability);
            capability
        }

        fn register_resource(&self, module_id: ModuleId, foreign_id: &str) -> ResourceId {
            let id = ResourceId::new();
            self.resources
                .lock()
                .unwrap()
                .insert((module_id, foreign_id.to_string()), id);
            id
        }

        fn unregister_resource(&self, module_id: ModuleId, foreign_id: &str) {
            self.resources
                .lock()
                .unwrap()
                .remove(&(module_id, foreign_id.to_string()));
        }
    }

    #[async_trait]
    impl DecisionStore for MemoryStore {
        async fn resolve_capability(
            &self,
            module_name: &str,
            action_name: &str,
        ) -> AppResult<Option<Capability>> {
            *self.resolve_calls.lock().unwrap() += 1;
            Ok(self
                .capabilities
                .get(&(module_name.to_string(), action_name.to_string()))
                .copied())
        }

        async fn direct_permission_ids(&self, user_id: UserId) -> AppResult<HashSet<PermissionId>> {
            Ok(self.direct.get(&user_id).cloned().unwrap_or_default())
        }

        async fn role_ids(&self, user_id: UserId) -> AppResult<HashSet<RoleId>> {
            Ok(self.memberships.get(&user_id).cloned().unwrap_or_default())
        }

        async fn role_permission_ids(&self, role_id: RoleId) -> AppResult<HashSet<PermissionId>> {
            Ok(self.role_grants.get(&role_id).cloned().unwrap_or_default())
        }

        async fn lookup_resource(
            &self,
            module_id: ModuleId,
            foreign_id: &str,
        ) -> AppResult<Option<ResourceId>> {
            Ok(self
                .resources
                .lock()
                .unwrap()
                .get(&(module_id, foreign_id.to_string()))
                .copied())
        }

        async fn object_grant_exists(
            &self,
            user_id: UserId,
            resource_id: ResourceId,
            permission_id: PermissionId,
        ) -> AppResult<bool> {
            match self.object_grants.get(&(user_id, resource_id, permission_id)) {
                Some(Some(expires_at)) => Ok(*expires_at > Utc::now()),
                Some(None) => Ok(true),
                None => Ok(false),
            }
        }
    }

    fn engine(store: MemoryStore) -> (DecisionEngine, Arc<MemoryStore>) {
        let store = Arc::new(store);
        (DecisionEngine::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_role_grant_allows_and_missing_grant_denies() {
        // Role "editor" holds article:update; U1 holds the role.
        let mut store = MemoryStore::default();
        let module_id = ModuleId::new();
        let update = store.define_capability("article", "update", module_id);
        store.define_capability("article", "delete", module_id);

        let editor = RoleId::new();
        let u1 = UserId::new();
        store.role_grants.insert(editor, HashSet::from([update.permission_id]));
        store.memberships.insert(u1, HashSet::from([editor]));

        let (engine, _) = engine(store);

        let decision = engine.authorize(u1, "article", "update", None).await.unwrap();
        assert_eq!(
            decision,
            Decision::Allow {
                source: GrantSource::Role
            }
        );

        let decision = engine.authorize(u1, "article", "delete", None).await.unwrap();
        assert_eq!(decision, Decision::deny("article", "delete"));
    }

    #[tokio::test]
    async fn test_direct_grant_allows() {
        let mut store = MemoryStore::default();
        let cap = store.define_capability("report", "read", ModuleId::new());
        let user = UserId::new();
        store.direct.insert(user, HashSet::from([cap.permission_id]));

        let (engine, _) = engine(store);
        let decision = engine.authorize(user, "report", "read", None).await.unwrap();
        assert_eq!(
            decision,
            Decision::Allow {
                source: GrantSource::Direct
            }
        );
    }

    #[tokio::test]
    async fn test_coarse_grant_short_circuits_object_path() {
        // U holds the permission via a role AND an object grant; the
        // coarse hit must win without consulting the object path.
        let mut store = MemoryStore::default();
        let module_id = ModuleId::new();
        let cap = store.define_capability("document", "read", module_id);

        let role = RoleId::new();
        let user = UserId::new();
        store.role_grants.insert(role, HashSet::from([cap.permission_id]));
        store.memberships.insert(user, HashSet::from([role]));

        let resource = store.register_resource(module_id, "42");
        store
            .object_grants
            .insert((user, resource, cap.permission_id), None);

        let (engine, _) = engine(store);
        let decision = engine
            .authorize(user, "document", "read", Some("42"))
            .await
            .unwrap();
        assert_eq!(
            decision,
            Decision::Allow {
                source: GrantSource::Role
            }
        );
    }

    #[tokio::test]
    async fn test_object_grant_escalation() {
        // U2 has no roles and no direct grants; only an object grant on
        // (document, "42").
        let mut store = MemoryStore::default();
        let module_id = ModuleId::new();
        let cap = store.define_capability("document", "read", module_id);

        let u2 = UserId::new();
        let resource = store.register_resource(module_id, "42");
        store
            .object_grants
            .insert((u2, resource, cap.permission_id), None);

        let (engine, _) = engine(store);

        let decision = engine
            .authorize(u2, "document", "read", Some("42"))
            .await
            .unwrap();
        assert_eq!(
            decision,
            Decision::Allow {
                source: GrantSource::Object
            }
        );

        // Unregistered foreign id: no resource row, no possible grant.
        let decision = engine
            .authorize(u2, "document", "read", Some("99"))
            .await
            .unwrap();
        assert_eq!(decision, Decision::deny("document", "read"));
    }

    #[tokio::test]
    async fn test_no_token_is_denial_not_error() {
        let mut store = MemoryStore::default();
        store.define_capability("document", "read", ModuleId::new());
        let user = UserId::new();

        let (engine, _) = engine(store);
        let decision = engine.authorize(user, "document", "read", None).await.unwrap();
        assert_eq!(decision, Decision::deny("document", "read"));
    }

    #[tokio::test]
    async fn test_unknown_capability_is_error() {
        let (engine, _) = engine(MemoryStore::default());
        let err = engine
            .authorize(UserId::new(), "document", "frobnicate", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownCapability);
    }

    #[tokio::test]
    async fn test_empty_token_is_structural_error() {
        let mut store = MemoryStore::default();
        store.define_capability("document", "read", ModuleId::new());

        let (engine, _) = engine(store);
        let err = engine
            .authorize(UserId::new(), "document", "read", Some(""))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingResourceToken);
    }

    #[tokio::test]
    async fn test_expired_object_grant_denies() {
        let mut store = MemoryStore::default();
        let module_id = ModuleId::new();
        let cap = store.define_capability("document", "read", module_id);

        let user = UserId::new();
        let resource = store.register_resource(module_id, "42");
        store.object_grants.insert(
            (user, resource, cap.permission_id),
            Some(Utc::now() - Duration::hours(1)),
        );

        let (engine, _) = engine(store);
        let decision = engine
            .authorize(user, "document", "read", Some("42"))
            .await
            .unwrap();
        assert_eq!(decision, Decision::deny("document", "read"));
    }

    #[tokio::test]
    async fn test_deregistered_resource_denies() {
        // After the registry collapses the resource, the same token no
        // longer resolves and the check denies.
        let mut store = MemoryStore::default();
        let module_id = ModuleId::new();
        let cap = store.define_capability("document", "read", module_id);

        let user = UserId::new();
        let resource = store.register_resource(module_id, "42");
        store
            .object_grants
            .insert((user, resource, cap.permission_id), None);

        let (engine, store) = engine(store);
        assert!(
            engine
                .authorize(user, "document", "read", Some("42"))
                .await
                .unwrap()
                .is_allowed()
        );

        store.unregister_resource(module_id, "42");
        let decision = engine
            .authorize(user, "document", "read", Some("42"))
            .await
            .unwrap();
        assert_eq!(decision, Decision::deny("document", "read"));
    }

    #[tokio::test]
    async fn test_require_maps_denial_to_error() {
        let mut store = MemoryStore::default();
        store.define_capability("article", "update", ModuleId::new());
        let user = UserId::new();

        let (engine, _) = engine(store);
        let err = engine
            .require(user, "article", "update", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccessDenied);
        assert_eq!(err.message, "access denied for article:update");
    }

    #[tokio::test]
    async fn test_catalog_cache_skips_repeat_resolution() {
        let mut store = MemoryStore::default();
        let cap = store.define_capability("article", "read", ModuleId::new());
        let user = UserId::new();
        let mut direct = HashSet::new();
        direct.insert(cap.permission_id);
        store.direct.insert(user, direct);

        let store = Arc::new(store);
        let cache = Arc::new(CatalogCache::new(&CacheConfig::default()));
        let engine = DecisionEngine::new(store.clone()).with_catalog_cache(cache);

        for _ in 0..3 {
            assert!(
                engine
                    .authorize(user, "article", "read", None)
                    .await
                    .unwrap()
                    .is_allowed()
            );
        }
        assert_eq!(*store.resolve_calls.lock().unwrap(), 1);
    }
}

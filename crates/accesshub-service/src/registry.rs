//! Resource identity registry.
//!
//! The registry is the only writer of resource rows. Grant services call
//! [`ResourceRegistry::resolve_or_create_in`] before inserting an object
//! grant and [`ResourceRegistry::delete_if_orphaned_in`] after revoking
//! one, both inside the grant's own transaction.

use std::sync::Arc;

use sqlx::PgConnection;

use accesshub_core::result::AppResult;
use accesshub_core::types::{ModuleId, ResourceId};
use accesshub_database::repositories::ResourceRepository;
use accesshub_entity::Resource;

/// Maps external entity identities to internal resource identifiers.
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    resource_repo: Arc<ResourceRepository>,
}

impl ResourceRegistry {
    /// Create a new resource registry.
    pub fn new(resource_repo: Arc<ResourceRepository>) -> Self {
        Self { resource_repo }
    }

    /// Get or create the resource identifier for (module, foreign id),
    /// inside the caller's transaction. Idempotent; a concurrent first
    /// registration is absorbed, never surfaced.
    pub async fn resolve_or_create_in(
        &self,
        conn: &mut PgConnection,
        module_id: ModuleId,
        foreign_id: &str,
    ) -> AppResult<ResourceId> {
        self.resource_repo
            .resolve_or_create(conn, module_id, foreign_id)
            .await
    }

    /// Look up a resource without creating it.
    pub async fn lookup(
        &self,
        module_id: ModuleId,
        foreign_id: &str,
    ) -> AppResult<Option<Resource>> {
        self.resource_repo.lookup(module_id, foreign_id).await
    }

    /// Collapse the resource row if no object grant references it any
    /// more. Returns whether a row was deleted.
    pub async fn delete_if_orphaned_in(
        &self,
        conn: &mut PgConnection,
        resource_id: ResourceId,
    ) -> AppResult<bool> {
        self.resource_repo.delete_if_orphaned(conn, resource_id).await
    }
}

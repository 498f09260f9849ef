//! PostgreSQL-backed implementation of the decision engine's read-only
//! store.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;

use accesshub_core::error::{AppError, ErrorKind};
use accesshub_core::result::AppResult;
use accesshub_core::traits::DecisionStore;
use accesshub_core::types::{Capability, ModuleId, PermissionId, ResourceId, RoleId, UserId};

/// Read-only snapshot of the grant relations, backed by the live pool.
///
/// Every method is a single query; the engine composes them into one
/// decision without holding any transaction open.
#[derive(Debug, Clone)]
pub struct PgDecisionStore {
    pool: PgPool,
}

impl PgDecisionStore {
    /// Create a new PostgreSQL decision store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DecisionStore for PgDecisionStore {
    async fn resolve_capability(
        &self,
        module_name: &str,
        action_name: &str,
    ) -> AppResult<Option<Capability>> {
        let row: Option<(ModuleId, PermissionId)> = sqlx::query_as(
            "SELECT p.module_id, p.id FROM permissions p \
             INNER JOIN modules m ON m.id = p.module_id \
             INNER JOIN actions a ON a.id = p.action_id \
             WHERE m.name = $1 AND a.name = $2",
        )
        .bind(module_name)
        .bind(action_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to resolve capability", e)
        })?;

        Ok(row.map(|(module_id, permission_id)| Capability {
            module_id,
            permission_id,
        }))
    }

    async fn direct_permission_ids(&self, user_id: UserId) -> AppResult<HashSet<PermissionId>> {
        let ids: Vec<PermissionId> =
            sqlx::query_scalar("SELECT permission_id FROM user_permissions WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load direct grants", e)
                })?;
        Ok(ids.into_iter().collect())
    }

    async fn role_ids(&self, user_id: UserId) -> AppResult<HashSet<RoleId>> {
        let ids: Vec<RoleId> =
            sqlx::query_scalar("SELECT role_id FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load user roles", e)
                })?;
        Ok(ids.into_iter().collect())
    }

    async fn role_permission_ids(&self, role_id: RoleId) -> AppResult<HashSet<PermissionId>> {
        let ids: Vec<PermissionId> =
            sqlx::query_scalar("SELECT permission_id FROM role_permissions WHERE role_id = $1")
                .bind(role_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load role grants", e)
                })?;
        Ok(ids.into_iter().collect())
    }

    async fn lookup_resource(
        &self,
        module_id: ModuleId,
        foreign_id: &str,
    ) -> AppResult<Option<ResourceId>> {
        sqlx::query_scalar("SELECT id FROM resources WHERE module_id = $1 AND foreign_id = $2")
            .bind(module_id)
            .bind(foreign_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to look up resource", e)
            })
    }

    async fn object_grant_exists(
        &self,
        user_id: UserId,
        resource_id: ResourceId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM object_permissions \
             WHERE user_id = $1 AND resource_id = $2 AND permission_id = $3 \
             AND (expires_at IS NULL OR expires_at > NOW()))",
        )
        .bind(user_id)
        .bind(resource_id)
        .bind(permission_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check object grant", e)
        })
    }
}

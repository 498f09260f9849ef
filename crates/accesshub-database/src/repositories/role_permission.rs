//! Role-permission grant store.

use std::collections::HashSet;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use accesshub_core::error::{AppError, ErrorKind};
use accesshub_core::result::AppResult;
use accesshub_core::types::{PermissionId, RoleId, UserId};
use accesshub_entity::RolePermission;

use super::is_unique_violation;

/// Repository for permissions granted to roles.
#[derive(Debug, Clone)]
pub struct RolePermissionRepository {
    pool: PgPool,
}

impl RolePermissionRepository {
    /// Create a new role-permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Permission identifiers currently granted to the role.
    pub async fn permission_ids(&self, role_id: RoleId) -> AppResult<HashSet<PermissionId>> {
        let ids: Vec<PermissionId> =
            sqlx::query_scalar("SELECT permission_id FROM role_permissions WHERE role_id = $1")
                .bind(role_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list role grants", e)
                })?;
        Ok(ids.into_iter().collect())
    }

    /// Transaction-scoped variant of [`Self::permission_ids`], used while
    /// computing the fresh subset of a bulk assign.
    pub async fn permission_ids_in(
        conn: &mut PgConnection,
        role_id: RoleId,
    ) -> AppResult<HashSet<PermissionId>> {
        let ids: Vec<PermissionId> =
            sqlx::query_scalar("SELECT permission_id FROM role_permissions WHERE role_id = $1")
                .bind(role_id)
                .fetch_all(&mut *conn)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list role grants", e)
                })?;
        Ok(ids.into_iter().collect())
    }

    /// Insert one grant row inside the caller's transaction.
    pub async fn insert(
        conn: &mut PgConnection,
        role_id: RoleId,
        permission_id: PermissionId,
        granted_by: UserId,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id, granted_by) \
             VALUES ($1, $2, $3)",
        )
        .bind(role_id)
        .bind(permission_id)
        .bind(granted_by)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_granted(format!(
                    "Permission {permission_id} already granted to role {role_id}"
                ))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to grant permission to role", e)
            }
        })?;
        Ok(())
    }

    /// Delete matching grant rows inside the caller's transaction and
    /// return how many were removed.
    pub async fn delete(
        conn: &mut PgConnection,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<u64> {
        let raw: Vec<Uuid> = permission_ids.iter().map(|p| p.0).collect();
        let result = sqlx::query(
            "DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = ANY($2)",
        )
        .bind(role_id)
        .bind(&raw)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke role grants", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Full grant rows for a role, for administrative listings.
    pub async fn list(&self, role_id: RoleId) -> AppResult<Vec<RolePermission>> {
        sqlx::query_as::<_, RolePermission>(
            "SELECT * FROM role_permissions WHERE role_id = $1 ORDER BY granted_at ASC",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list role grants", e))
    }
}

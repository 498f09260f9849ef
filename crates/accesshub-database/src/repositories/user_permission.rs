//! Direct user-permission grant store.

use std::collections::HashSet;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use accesshub_core::error::{AppError, ErrorKind};
use accesshub_core::result::AppResult;
use accesshub_core::types::{PermissionId, UserId};
use accesshub_entity::UserPermission;

use super::is_unique_violation;

/// Repository for permissions granted directly to users.
#[derive(Debug, Clone)]
pub struct UserPermissionRepository {
    pool: PgPool,
}

impl UserPermissionRepository {
    /// Create a new user-permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Permission identifiers currently granted directly to the user.
    pub async fn permission_ids(&self, user_id: UserId) -> AppResult<HashSet<PermissionId>> {
        let ids: Vec<PermissionId> =
            sqlx::query_scalar("SELECT permission_id FROM user_permissions WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list user grants", e)
                })?;
        Ok(ids.into_iter().collect())
    }

    /// Transaction-scoped variant of [`Self::permission_ids`].
    pub async fn permission_ids_in(
        conn: &mut PgConnection,
        user_id: UserId,
    ) -> AppResult<HashSet<PermissionId>> {
        let ids: Vec<PermissionId> =
            sqlx::query_scalar("SELECT permission_id FROM user_permissions WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&mut *conn)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list user grants", e)
                })?;
        Ok(ids.into_iter().collect())
    }

    /// Insert one grant row inside the caller's transaction.
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: UserId,
        permission_id: PermissionId,
        granted_by: UserId,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_permissions (user_id, permission_id, granted_by) \
             VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(permission_id)
        .bind(granted_by)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_granted(format!(
                    "Permission {permission_id} already granted to user {user_id}"
                ))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to grant permission to user", e)
            }
        })?;
        Ok(())
    }

    /// Delete matching grant rows inside the caller's transaction and
    /// return how many were removed.
    pub async fn delete(
        conn: &mut PgConnection,
        user_id: UserId,
        permission_ids: &[PermissionId],
    ) -> AppResult<u64> {
        let raw: Vec<Uuid> = permission_ids.iter().map(|p| p.0).collect();
        let result = sqlx::query(
            "DELETE FROM user_permissions WHERE user_id = $1 AND permission_id = ANY($2)",
        )
        .bind(user_id)
        .bind(&raw)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke user grants", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Full grant rows for a user, for administrative listings.
    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<UserPermission>> {
        sqlx::query_as::<_, UserPermission>(
            "SELECT * FROM user_permissions WHERE user_id = $1 ORDER BY granted_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user grants", e))
    }
}

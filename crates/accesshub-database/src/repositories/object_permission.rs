//! Object-level permission grant store.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use accesshub_core::error::{AppError, ErrorKind};
use accesshub_core::result::AppResult;
use accesshub_core::types::{PermissionId, ResourceId, UserId};
use accesshub_entity::ObjectPermission;

use super::is_unique_violation;

/// Repository for permissions granted on one specific resource instance.
#[derive(Debug, Clone)]
pub struct ObjectPermissionRepository {
    pool: PgPool,
}

impl ObjectPermissionRepository {
    /// Create a new object-permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Permission identifiers the user holds on the resource, read inside
    /// the caller's transaction (expired grants included: overlap policy
    /// applies to rows, not validity).
    pub async fn permission_ids_in(
        conn: &mut PgConnection,
        user_id: UserId,
        resource_id: ResourceId,
    ) -> AppResult<HashSet<PermissionId>> {
        let ids: Vec<PermissionId> = sqlx::query_scalar(
            "SELECT permission_id FROM object_permissions \
             WHERE user_id = $1 AND resource_id = $2",
        )
        .bind(user_id)
        .bind(resource_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list object grants", e)
        })?;
        Ok(ids.into_iter().collect())
    }

    /// Insert one grant row inside the caller's transaction.
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: UserId,
        resource_id: ResourceId,
        permission_id: PermissionId,
        granted_by: UserId,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO object_permissions \
             (user_id, resource_id, permission_id, granted_by, expires_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user_id)
        .bind(resource_id)
        .bind(permission_id)
        .bind(granted_by)
        .bind(expires_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_granted(format!(
                    "Permission {permission_id} already granted to user {user_id} \
                     for resource {resource_id}"
                ))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to grant object permission", e)
            }
        })?;
        Ok(())
    }

    /// Delete matching grant rows inside the caller's transaction and
    /// return how many were removed.
    pub async fn delete(
        conn: &mut PgConnection,
        user_id: UserId,
        resource_id: ResourceId,
        permission_ids: &[PermissionId],
    ) -> AppResult<u64> {
        let raw: Vec<Uuid> = permission_ids.iter().map(|p| p.0).collect();
        let result = sqlx::query(
            "DELETE FROM object_permissions \
             WHERE user_id = $1 AND resource_id = $2 AND permission_id = ANY($3)",
        )
        .bind(user_id)
        .bind(resource_id)
        .bind(&raw)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke object grants", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Full object-grant rows for a user, for administrative listings.
    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<ObjectPermission>> {
        sqlx::query_as::<_, ObjectPermission>(
            "SELECT * FROM object_permissions WHERE user_id = $1 ORDER BY granted_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list object grants", e)
        })
    }
}

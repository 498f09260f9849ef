//! Role grant administration.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use accesshub_core::error::{AppError, ErrorKind};
use accesshub_core::result::AppResult;
use accesshub_core::types::{PermissionId, RoleId, UserId};
use accesshub_database::repositories::RolePermissionRepository;
use accesshub_entity::RolePermission;

use super::select_fresh;

/// Manages permissions granted to roles.
#[derive(Debug, Clone)]
pub struct RoleGrantService {
    pool: PgPool,
    role_permission_repo: Arc<RolePermissionRepository>,
}

impl RoleGrantService {
    /// Creates a new role grant service.
    pub fn new(pool: PgPool, role_permission_repo: Arc<RolePermissionRepository>) -> Self {
        Self {
            pool,
            role_permission_repo,
        }
    }

    /// Grants permissions to a role, inserting only the subset not yet
    /// granted. Fails with `AlreadyGranted` when there is nothing fresh.
    /// Returns the identifiers actually inserted.
    pub async fn assign(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
        granted_by: UserId,
    ) -> AppResult<Vec<PermissionId>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let existing = RolePermissionRepository::permission_ids_in(&mut tx, role_id).await?;
        let fresh = select_fresh(permission_ids, &existing)?;
        for permission_id in &fresh {
            RolePermissionRepository::insert(&mut tx, role_id, *permission_id, granted_by).await?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(%role_id, granted = fresh.len(), %granted_by, "Granted permissions to role");
        Ok(fresh)
    }

    /// Revokes permissions from a role. Fails with `NothingToRevoke` when
    /// no listed grant exists; otherwise returns how many were removed.
    pub async fn revoke(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let revoked = RolePermissionRepository::delete(&mut tx, role_id, permission_ids).await?;
        if revoked == 0 {
            return Err(AppError::nothing_to_revoke(format!(
                "None of the listed permissions are granted to role {role_id}"
            )));
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(%role_id, revoked, "Revoked permissions from role");
        Ok(revoked)
    }

    /// Lists the role's grant rows.
    pub async fn list(&self, role_id: RoleId) -> AppResult<Vec<RolePermission>> {
        self.role_permission_repo.list(role_id).await
    }
}

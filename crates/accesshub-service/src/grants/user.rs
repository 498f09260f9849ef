//! Direct user grant administration.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use accesshub_core::error::{AppError, ErrorKind};
use accesshub_core::result::AppResult;
use accesshub_core::types::{PermissionId, UserId};
use accesshub_database::repositories::UserPermissionRepository;
use accesshub_entity::UserPermission;

use super::select_fresh;

/// Manages permissions granted directly to users, bypassing roles.
#[derive(Debug, Clone)]
pub struct UserGrantService {
    pool: PgPool,
    user_permission_repo: Arc<UserPermissionRepository>,
}

impl UserGrantService {
    /// Creates a new user grant service.
    pub fn new(pool: PgPool, user_permission_repo: Arc<UserPermissionRepository>) -> Self {
        Self {
            pool,
            user_permission_repo,
        }
    }

    /// Grants permissions directly to a user, inserting only the subset
    /// not yet granted. Returns the identifiers actually inserted.
    pub async fn assign(
        &self,
        user_id: UserId,
        permission_ids: &[PermissionId],
        granted_by: UserId,
    ) -> AppResult<Vec<PermissionId>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let existing = UserPermissionRepository::permission_ids_in(&mut tx, user_id).await?;
        let fresh = select_fresh(permission_ids, &existing)?;
        for permission_id in &fresh {
            UserPermissionRepository::insert(&mut tx, user_id, *permission_id, granted_by).await?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(%user_id, granted = fresh.len(), %granted_by, "Granted permissions to user");
        Ok(fresh)
    }

    /// Revokes direct grants from a user. Fails with `NothingToRevoke`
    /// when no listed grant exists.
    pub async fn revoke(
        &self,
        user_id: UserId,
        permission_ids: &[PermissionId],
    ) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let revoked = UserPermissionRepository::delete(&mut tx, user_id, permission_ids).await?;
        if revoked == 0 {
            return Err(AppError::nothing_to_revoke(format!(
                "None of the listed permissions are granted to user {user_id}"
            )));
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(%user_id, revoked, "Revoked direct permissions from user");
        Ok(revoked)
    }

    /// Lists the user's direct grant rows.
    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<UserPermission>> {
        self.user_permission_repo.list(user_id).await
    }
}

//! Object-level grant administration.
//!
//! Granting registers the target resource on first use; revoking
//! collapses the resource row again once its last grant is gone. Both
//! sides run inside one transaction so the registry and the grant store
//! never disagree.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use accesshub_core::error::{AppError, ErrorKind};
use accesshub_core::result::AppResult;
use accesshub_core::types::{ModuleId, PermissionId, UserId};
use accesshub_database::repositories::ObjectPermissionRepository;
use accesshub_entity::ObjectPermission;

use super::select_fresh;
use crate::registry::ResourceRegistry;

/// Manages per-resource permission grants.
#[derive(Debug, Clone)]
pub struct ObjectGrantService {
    pool: PgPool,
    object_permission_repo: Arc<ObjectPermissionRepository>,
    registry: ResourceRegistry,
}

impl ObjectGrantService {
    /// Creates a new object grant service.
    pub fn new(
        pool: PgPool,
        object_permission_repo: Arc<ObjectPermissionRepository>,
        registry: ResourceRegistry,
    ) -> Self {
        Self {
            pool,
            object_permission_repo,
            registry,
        }
    }

    /// Grants permissions to a user on one specific entity, registering
    /// the entity's resource row if this is its first grant. Inserts only
    /// the subset not yet granted; returns the identifiers inserted.
    pub async fn assign(
        &self,
        user_id: UserId,
        module_id: ModuleId,
        foreign_id: &str,
        permission_ids: &[PermissionId],
        granted_by: UserId,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<PermissionId>> {
        if foreign_id.is_empty() {
            return Err(AppError::missing_resource_token(
                "An object grant requires a non-empty resource token",
            ));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let resource_id = self
            .registry
            .resolve_or_create_in(&mut tx, module_id, foreign_id)
            .await?;
        let existing =
            ObjectPermissionRepository::permission_ids_in(&mut tx, user_id, resource_id).await?;
        let fresh = select_fresh(permission_ids, &existing)?;
        for permission_id in &fresh {
            ObjectPermissionRepository::insert(
                &mut tx,
                user_id,
                resource_id,
                *permission_id,
                granted_by,
                expires_at,
            )
            .await?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(
            %user_id,
            %resource_id,
            foreign_id,
            granted = fresh.len(),
            %granted_by,
            "Granted object permissions"
        );
        Ok(fresh)
    }

    /// Revokes object grants from a user and collapses the resource row
    /// when its last grant goes. Fails with `NothingToRevoke` when the
    /// entity was never registered or no listed grant exists.
    pub async fn revoke(
        &self,
        user_id: UserId,
        module_id: ModuleId,
        foreign_id: &str,
        permission_ids: &[PermissionId],
    ) -> AppResult<u64> {
        let resource = self
            .registry
            .lookup(module_id, foreign_id)
            .await?
            .ok_or_else(|| {
                AppError::nothing_to_revoke(format!(
                    "No resource registered for token '{foreign_id}'"
                ))
            })?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let revoked =
            ObjectPermissionRepository::delete(&mut tx, user_id, resource.id, permission_ids)
                .await?;
        if revoked == 0 {
            return Err(AppError::nothing_to_revoke(format!(
                "None of the listed permissions are granted to user {user_id} \
                 on resource '{foreign_id}'"
            )));
        }

        let collapsed = self.registry.delete_if_orphaned_in(&mut tx, resource.id).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(
            %user_id,
            resource_id = %resource.id,
            foreign_id,
            revoked,
            collapsed,
            "Revoked object permissions"
        );
        Ok(revoked)
    }

    /// Lists the user's object-grant rows.
    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<ObjectPermission>> {
        self.object_permission_repo.list(user_id).await
    }
}

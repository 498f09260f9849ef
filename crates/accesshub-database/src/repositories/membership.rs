//! User-role membership store.

use std::collections::HashSet;

use sqlx::PgPool;

use accesshub_core::error::{AppError, ErrorKind};
use accesshub_core::result::AppResult;
use accesshub_core::types::{RoleId, UserId};
use accesshub_entity::grant::UserRole;

use super::is_unique_violation;

/// Repository for user-role assignments.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Role identifiers assigned to the user.
    pub async fn role_ids(&self, user_id: UserId) -> AppResult<HashSet<RoleId>> {
        let ids: Vec<RoleId> =
            sqlx::query_scalar("SELECT role_id FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list user roles", e)
                })?;
        Ok(ids.into_iter().collect())
    }

    /// Assign a role to a user. Fails with `AlreadyGranted` if the pair
    /// already exists; the unique constraint is the arbiter.
    pub async fn assign(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: UserId,
    ) -> AppResult<UserRole> {
        sqlx::query_as::<_, UserRole>(
            "INSERT INTO user_roles (user_id, role_id, assigned_by) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(role_id)
        .bind(assigned_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_granted(format!(
                    "Role {role_id} already assigned to user {user_id}"
                ))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to assign role", e)
            }
        })
    }

    /// Remove a role from a user. Fails with `NothingToRevoke` if the
    /// pair does not exist.
    pub async fn deassign(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to deassign role", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::nothing_to_revoke(format!(
                "Role {role_id} is not assigned to user {user_id}"
            )));
        }
        Ok(())
    }

    /// Full membership rows for a user, for administrative listings.
    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<UserRole>> {
        sqlx::query_as::<_, UserRole>(
            "SELECT * FROM user_roles WHERE user_id = $1 ORDER BY assigned_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user roles", e))
    }
}

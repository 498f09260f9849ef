//! Role membership administration.

use std::sync::Arc;

use tracing::info;

use accesshub_core::result::AppResult;
use accesshub_core::types::{RoleId, UserId};
use accesshub_database::repositories::MembershipRepository;
use accesshub_entity::grant::UserRole;

/// Manages which roles a user holds.
#[derive(Debug, Clone)]
pub struct MembershipService {
    membership_repo: Arc<MembershipRepository>,
}

impl MembershipService {
    /// Creates a new membership service.
    pub fn new(membership_repo: Arc<MembershipRepository>) -> Self {
        Self { membership_repo }
    }

    /// Assigns a role to a user. Fails with `AlreadyGranted` if the user
    /// already holds the role.
    pub async fn assign(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: UserId,
    ) -> AppResult<UserRole> {
        let membership = self
            .membership_repo
            .assign(user_id, role_id, assigned_by)
            .await?;
        info!(%user_id, %role_id, %assigned_by, "Assigned role to user");
        Ok(membership)
    }

    /// Removes a role from a user. Fails with `NothingToRevoke` if the
    /// user does not hold the role.
    pub async fn deassign(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.membership_repo.deassign(user_id, role_id).await?;
        info!(%user_id, %role_id, "Removed role from user");
        Ok(())
    }

    /// Lists the user's membership rows.
    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<UserRole>> {
        self.membership_repo.list(user_id).await
    }
}

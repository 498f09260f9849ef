//! Direct user-permission grant entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use accesshub_core::types::{PermissionId, UserId};

/// A permission granted directly to a user, bypassing roles; unique per
/// (user, permission) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPermission {
    /// Unique grant row identifier.
    pub id: uuid::Uuid,
    /// The user receiving the permission.
    pub user_id: UserId,
    /// The granted permission.
    pub permission_id: PermissionId,
    /// Who granted it.
    pub granted_by: Option<UserId>,
    /// When it was granted.
    pub granted_at: DateTime<Utc>,
}

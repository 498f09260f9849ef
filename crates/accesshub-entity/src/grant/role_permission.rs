//! Role-permission grant entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use accesshub_core::types::{PermissionId, RoleId, UserId};

/// A permission granted to a role; unique per (role, permission) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RolePermission {
    /// Unique grant row identifier.
    pub id: uuid::Uuid,
    /// The role receiving the permission.
    pub role_id: RoleId,
    /// The granted permission.
    pub permission_id: PermissionId,
    /// Who granted it.
    pub granted_by: Option<UserId>,
    /// When it was granted.
    pub granted_at: DateTime<Utc>,
}

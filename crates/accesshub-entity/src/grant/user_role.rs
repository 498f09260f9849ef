//! User-role membership entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use accesshub_core::types::{RoleId, UserId};

/// A role assigned to a user; unique per (user, role) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRole {
    /// Unique membership row identifier.
    pub id: uuid::Uuid,
    /// The user holding the role.
    pub user_id: UserId,
    /// The assigned role.
    pub role_id: RoleId,
    /// Who assigned it.
    pub assigned_by: Option<UserId>,
    /// When it was assigned.
    pub assigned_at: DateTime<Utc>,
}

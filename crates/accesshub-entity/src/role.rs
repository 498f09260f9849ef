//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use accesshub_core::types::{RoleId, UserId};

/// A named bundle of permissions assignable to users.
///
/// `parent_role_id` is structural only: the decision algorithm never
/// traverses the role hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: RoleId,
    /// Unique role name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Optional parent role reference (not evaluated by the engine).
    pub parent_role_id: Option<RoleId>,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// The administrator who created it.
    pub created_by: Option<UserId>,
}

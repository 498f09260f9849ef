//! Permission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use accesshub_core::types::{ActionId, ModuleId, PermissionId, UserId};

/// A capability: exactly one (module, action) pair.
///
/// At most one permission exists per pair; the display name is derived as
/// `module:action` at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: PermissionId,
    /// Derived display name, `module:action`.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// The module this permission protects.
    pub module_id: ModuleId,
    /// The action verb.
    pub action_id: ActionId,
    /// When the permission was created.
    pub created_at: DateTime<Utc>,
    /// The administrator who created it.
    pub created_by: Option<UserId>,
}

/// Derive the display name for a (module, action) pair.
pub fn permission_name(module_name: &str, action_name: &str) -> String {
    format!("{module_name}:{action_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_name() {
        assert_eq!(permission_name("article", "update"), "article:update");
    }
}

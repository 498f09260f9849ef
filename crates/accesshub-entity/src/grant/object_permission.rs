//! Object-level permission grant entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use accesshub_core::types::{PermissionId, ResourceId, UserId};

/// A permission granted to a user for one specific resource instance;
/// unique per (user, resource, permission) triple.
///
/// Deassigning the last grant referencing a resource triggers resource
/// cleanup in the registry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ObjectPermission {
    /// Unique grant row identifier.
    pub id: uuid::Uuid,
    /// The user receiving the permission.
    pub user_id: UserId,
    /// The resource instance the grant is scoped to.
    pub resource_id: ResourceId,
    /// The granted permission.
    pub permission_id: PermissionId,
    /// Who granted it.
    pub granted_by: Option<UserId>,
    /// When it was granted.
    pub granted_at: DateTime<Utc>,
    /// When the grant expires (None = never).
    pub expires_at: Option<DateTime<Utc>>,
}

impl ObjectPermission {
    /// Check if this grant has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| exp <= Utc::now()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn grant(expires_at: Option<DateTime<Utc>>) -> ObjectPermission {
        ObjectPermission {
            id: uuid::Uuid::new_v4(),
            user_id: UserId::new(),
            resource_id: ResourceId::new(),
            permission_id: PermissionId::new(),
            granted_by: None,
            granted_at: Utc::now(),
            expires_at,
        }
    }

    #[test]
    fn test_never_expires() {
        assert!(!grant(None).is_expired());
    }

    #[test]
    fn test_expired_in_the_past() {
        assert!(grant(Some(Utc::now() - Duration::hours(1))).is_expired());
        assert!(!grant(Some(Utc::now() + Duration::hours(1))).is_expired());
    }
}

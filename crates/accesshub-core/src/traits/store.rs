//! Read-only snapshot trait consumed by the decision engine.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{Capability, ModuleId, PermissionId, ResourceId, RoleId, UserId};

/// Read-only view of the grant relations the decision algorithm consults.
///
/// The engine never mutates state through this trait, which keeps the
/// decision path independently testable from the grant stores: production
/// code implements it over PostgreSQL, unit tests implement it over plain
/// hash maps.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Resolve a (module name, action name) pair to its internal
    /// identifiers. `None` means the capability is unknown.
    async fn resolve_capability(
        &self,
        module_name: &str,
        action_name: &str,
    ) -> AppResult<Option<Capability>>;

    /// Permissions granted directly to the user.
    async fn direct_permission_ids(&self, user_id: UserId) -> AppResult<HashSet<PermissionId>>;

    /// Roles assigned to the user.
    async fn role_ids(&self, user_id: UserId) -> AppResult<HashSet<RoleId>>;

    /// Permissions granted to a role.
    async fn role_permission_ids(&self, role_id: RoleId) -> AppResult<HashSet<PermissionId>>;

    /// Look up a registered resource by its external identity. Pure read;
    /// never creates.
    async fn lookup_resource(
        &self,
        module_id: ModuleId,
        foreign_id: &str,
    ) -> AppResult<Option<ResourceId>>;

    /// Whether an unexpired object-level grant exists for the exact
    /// (user, resource, permission) triple.
    async fn object_grant_exists(
        &self,
        user_id: UserId,
        resource_id: ResourceId,
        permission_id: PermissionId,
    ) -> AppResult<bool>;
}

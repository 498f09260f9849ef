//! Grant and membership row entities.
//!
//! Three structurally parallel grant relations (role-permission,
//! user-permission, object-permission) plus the user-role membership
//! relation. Each row records its grantor and timestamp.

pub mod object_permission;
pub mod role_permission;
pub mod user_permission;
pub mod user_role;

pub use object_permission::ObjectPermission;
pub use role_permission::RolePermission;
pub use user_permission::UserPermission;
pub use user_role::UserRole;

//! Repository implementations for all AccessHub relations.

pub mod catalog;
pub mod membership;
pub mod object_permission;
pub mod resource;
pub mod role;
pub mod role_permission;
pub mod user;
pub mod user_permission;

pub use catalog::CatalogRepository;
pub use membership::MembershipRepository;
pub use object_permission::ObjectPermissionRepository;
pub use resource::ResourceRepository;
pub use role::RoleRepository;
pub use role_permission::RolePermissionRepository;
pub use user::UserRepository;
pub use user_permission::UserPermissionRepository;

/// Whether a sqlx error is a PostgreSQL unique-constraint violation.
///
/// Used to map duplicate grant inserts onto the state-conflict error
/// kinds instead of a generic database failure.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505")
}

//! Shared type definitions: typed identifiers and decision outcomes.

pub mod decision;
pub mod id;

pub use decision::{Capability, Decision, GrantSource};
pub use id::{ActionId, ModuleId, PermissionId, ResourceId, RoleId, UserId};

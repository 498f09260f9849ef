//! # accesshub-entity
//!
//! Domain entity models for AccessHub. Every struct in this crate
//! represents a database table row. All entities derive `Debug`, `Clone`,
//! `Serialize`, `Deserialize`, and `sqlx::FromRow`.

pub mod catalog;
pub mod grant;
pub mod resource;
pub mod role;
pub mod user;

pub use catalog::{Action, Module, Permission};
pub use grant::{ObjectPermission, RolePermission, UserPermission, UserRole};
pub use resource::Resource;
pub use role::Role;
pub use user::User;

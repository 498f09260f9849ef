//! Catalog entities: the canonical registry of modules, actions, and
//! the permissions formed from their cross product.

pub mod action;
pub mod module;
pub mod permission;

pub use action::Action;
pub use module::Module;
pub use permission::Permission;

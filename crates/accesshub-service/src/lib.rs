//! # accesshub-service
//!
//! Administrative services over the grant stores: catalog population,
//! role and user grant management, role membership, and object-level
//! grants with resource lifecycle handling. Services own the
//! transactions; repositories stay single-statement.

pub mod catalog;
pub mod grants;
pub mod registry;

pub use catalog::CatalogService;
pub use grants::{
    MembershipService, ObjectGrantService, RoleGrantService, UserGrantService, select_fresh,
};
pub use registry::ResourceRegistry;

//! # accesshub-authz
//!
//! The authorization decision engine. Resolves a capability through the
//! catalog, unions role-derived and direct permission grants, and
//! escalates to the object-level grant check only when coarse-grained
//! grants do not already satisfy the request.

pub mod cache;
pub mod engine;

pub use cache::CatalogCache;
pub use engine::DecisionEngine;

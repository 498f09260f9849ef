//! # accesshub-core
//!
//! Core crate for AccessHub. Contains typed identifiers, decision types,
//! configuration schemas, the read-only decision-store trait, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other AccessHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

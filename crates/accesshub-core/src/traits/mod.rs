//! Cross-crate trait definitions.

pub mod store;

pub use store::DecisionStore;

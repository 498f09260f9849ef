//! # accesshub-database
//!
//! PostgreSQL connection management, migrations, concrete repository
//! implementations for all AccessHub relations, and the PostgreSQL-backed
//! [`accesshub_core::traits::DecisionStore`] used by the decision engine.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::PgDecisionStore;

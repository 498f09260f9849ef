//! Resource entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use accesshub_core::types::{ModuleId, ResourceId};

/// The internal address for one external entity instance, keyed by
/// (module, foreign id).
///
/// Rows are created and destroyed exclusively by the resource registry:
/// created the first time an object-level grant targets the external
/// entity, deleted once no object grant references them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: ResourceId,
    /// The module the external entity belongs to.
    pub module_id: ModuleId,
    /// The externally-owned identifier of the entity.
    pub foreign_id: String,
    /// When the resource was first registered.
    pub created_at: DateTime<Utc>,
}

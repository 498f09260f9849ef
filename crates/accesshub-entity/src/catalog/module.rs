//! Module entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use accesshub_core::types::{ModuleId, UserId};

/// A protected subsystem (e.g. `"article"`, `"document"`).
///
/// Modules are created administratively and are immutable after creation
/// except for deletion when the subsystem disappears.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Module {
    /// Unique module identifier.
    pub id: ModuleId,
    /// Unique module name.
    pub name: String,
    /// When the module was registered.
    pub created_at: DateTime<Utc>,
    /// The administrator who registered it.
    pub created_by: Option<UserId>,
}

//! Action entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use accesshub_core::types::{ActionId, UserId};

/// A verb shared across modules (e.g. `"create"`, `"read"`, `"update"`,
/// `"delete"`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Action {
    /// Unique action identifier.
    pub id: ActionId,
    /// Unique action name.
    pub name: String,
    /// When the action was registered.
    pub created_at: DateTime<Utc>,
    /// The administrator who registered it.
    pub created_by: Option<UserId>,
}

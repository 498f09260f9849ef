//! Resource repository: the identity registry's backing relation.

use sqlx::{PgConnection, PgPool};
use tracing::debug;

use accesshub_core::error::{AppError, ErrorKind};
use accesshub_core::result::AppResult;
use accesshub_core::types::{ModuleId, ResourceId};
use accesshub_entity::Resource;

/// How many times a racing get-or-create re-reads before giving up.
const RESOLVE_ATTEMPTS: u32 = 3;

/// Repository for resource identity rows.
///
/// Callers outside the registry must never insert or delete rows here
/// directly; the registry owns the lifecycle.
#[derive(Debug, Clone)]
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    /// Create a new resource repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get or create the resource row for (module, foreign id).
    ///
    /// Idempotent: repeated calls return the same identifier. A concurrent
    /// first-call race is resolved by the (module_id, foreign_id) unique
    /// constraint: the losing insert is a no-op and the winner's row is
    /// re-read, never surfaced as an error.
    pub async fn resolve_or_create(
        &self,
        conn: &mut PgConnection,
        module_id: ModuleId,
        foreign_id: &str,
    ) -> AppResult<ResourceId> {
        for _ in 0..RESOLVE_ATTEMPTS {
            let inserted: Option<ResourceId> = sqlx::query_scalar(
                "INSERT INTO resources (module_id, foreign_id) VALUES ($1, $2) \
                 ON CONFLICT (module_id, foreign_id) DO NOTHING RETURNING id",
            )
            .bind(module_id)
            .bind(foreign_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create resource", e)
            })?;

            if let Some(id) = inserted {
                debug!(%module_id, foreign_id, resource_id = %id, "Registered resource");
                return Ok(id);
            }

            // Someone else created it; re-read and return their row. The
            // loop covers the narrow window where that row is deleted
            // again between our insert and the read.
            let existing: Option<ResourceId> = sqlx::query_scalar(
                "SELECT id FROM resources WHERE module_id = $1 AND foreign_id = $2",
            )
            .bind(module_id)
            .bind(foreign_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to look up resource", e)
            })?;

            if let Some(id) = existing {
                return Ok(id);
            }
        }

        Err(AppError::database(
            "Resource registration kept racing with concurrent deletion",
        ))
    }

    /// Look up a resource by its external identity. Pure read; never
    /// creates.
    pub async fn lookup(
        &self,
        module_id: ModuleId,
        foreign_id: &str,
    ) -> AppResult<Option<Resource>> {
        sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources WHERE module_id = $1 AND foreign_id = $2",
        )
        .bind(module_id)
        .bind(foreign_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up resource", e))
    }

    /// Delete the resource row if and only if no object-permission grant
    /// references it; no-op otherwise. Single guarded statement so it
    /// commits atomically with the caller's grant deletion.
    pub async fn delete_if_orphaned(
        &self,
        conn: &mut PgConnection,
        resource_id: ResourceId,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM resources WHERE id = $1 \
             AND NOT EXISTS (SELECT 1 FROM object_permissions WHERE resource_id = $1)",
        )
        .bind(resource_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to collapse orphaned resource", e)
        })?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!(%resource_id, "Deleted orphaned resource");
        }
        Ok(deleted)
    }
}

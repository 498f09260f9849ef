//! Catalog repository: modules, actions, and permissions.
//!
//! Name-to-identifier resolution is the only operation on the decision
//! path; everything else is administrative population.

use sqlx::PgPool;

use accesshub_core::error::{AppError, ErrorKind};
use accesshub_core::result::AppResult;
use accesshub_core::types::{ActionId, Capability, ModuleId, PermissionId, UserId};
use accesshub_entity::catalog::permission::permission_name;
use accesshub_entity::{Action, Module, Permission};

use super::is_unique_violation;

/// Repository for the canonical module/action/permission registry.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    /// Create a new catalog repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a (module name, action name) pair to its internal
    /// identifiers in one round trip. Returns `None` when either name is
    /// unknown or no permission exists for the exact pair.
    pub async fn resolve_capability(
        &self,
        module_name: &str,
        action_name: &str,
    ) -> AppResult<Option<Capability>> {
        let row: Option<(ModuleId, PermissionId)> = sqlx::query_as(
            "SELECT p.module_id, p.id FROM permissions p \
             INNER JOIN modules m ON m.id = p.module_id \
             INNER JOIN actions a ON a.id = p.action_id \
             WHERE m.name = $1 AND a.name = $2",
        )
        .bind(module_name)
        .bind(action_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to resolve capability", e)
        })?;

        Ok(row.map(|(module_id, permission_id)| Capability {
            module_id,
            permission_id,
        }))
    }

    /// Find a module by name.
    pub async fn find_module_by_name(&self, name: &str) -> AppResult<Option<Module>> {
        sqlx::query_as::<_, Module>("SELECT * FROM modules WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find module by name", e)
            })
    }

    /// Find an action by name.
    pub async fn find_action_by_name(&self, name: &str) -> AppResult<Option<Action>> {
        sqlx::query_as::<_, Action>("SELECT * FROM actions WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find action by name", e)
            })
    }

    /// Register a new module. Fails with `Conflict` if the name exists.
    pub async fn create_module(
        &self,
        name: &str,
        created_by: Option<UserId>,
    ) -> AppResult<Module> {
        sqlx::query_as::<_, Module>(
            "INSERT INTO modules (name, created_by) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Module '{name}' already exists"))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create module", e)
            }
        })
    }

    /// Register a new action. Fails with `Conflict` if the name exists.
    pub async fn create_action(
        &self,
        name: &str,
        created_by: Option<UserId>,
    ) -> AppResult<Action> {
        sqlx::query_as::<_, Action>(
            "INSERT INTO actions (name, created_by) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Action '{name}' already exists"))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create action", e)
            }
        })
    }

    /// Create the permission for a (module, action) pair, deriving its
    /// `module:action` display name. Fails with `Conflict` if the pair
    /// already has a permission.
    pub async fn create_permission(
        &self,
        module_id: ModuleId,
        action_id: ActionId,
        description: Option<&str>,
        created_by: Option<UserId>,
    ) -> AppResult<Permission> {
        let names: Option<(String, String)> = sqlx::query_as(
            "SELECT m.name, a.name FROM modules m, actions a WHERE m.id = $1 AND a.id = $2",
        )
        .bind(module_id)
        .bind(action_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load capability names", e)
        })?;

        let (module_name, action_name) = names
            .ok_or_else(|| AppError::not_found("Module or action not found"))?;
        let name = permission_name(&module_name, &action_name);

        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (name, description, module_id, action_id, created_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&name)
        .bind(description)
        .bind(module_id)
        .bind(action_id)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Permission '{name}' already exists"))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create permission", e)
            }
        })
    }

    /// List all registered modules.
    pub async fn list_modules(&self) -> AppResult<Vec<Module>> {
        sqlx::query_as::<_, Module>("SELECT * FROM modules ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list modules", e))
    }

    /// List all registered actions.
    pub async fn list_actions(&self) -> AppResult<Vec<Action>> {
        sqlx::query_as::<_, Action>("SELECT * FROM actions ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list actions", e))
    }

    /// List all registered permissions.
    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list permissions", e)
            })
    }

    /// Find a permission by its derived display name.
    pub async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find permission by name", e)
            })
    }
}

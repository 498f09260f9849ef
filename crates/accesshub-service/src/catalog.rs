//! Catalog administration — registering modules, actions, and the
//! permissions that pair them.

use std::sync::Arc;

use tracing::info;

use accesshub_authz::CatalogCache;
use accesshub_core::error::AppError;
use accesshub_core::result::AppResult;
use accesshub_core::types::UserId;
use accesshub_database::repositories::CatalogRepository;
use accesshub_entity::{Action, Module, Permission};

/// Manages the module/action/permission catalog.
#[derive(Debug, Clone)]
pub struct CatalogService {
    /// Catalog repository.
    catalog_repo: Arc<CatalogRepository>,
    /// Decision-path resolution cache (for invalidation on mutation).
    catalog_cache: Option<Arc<CatalogCache>>,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(catalog_repo: Arc<CatalogRepository>) -> Self {
        Self {
            catalog_repo,
            catalog_cache: None,
        }
    }

    /// Attach the decision engine's catalog cache so catalog mutations
    /// invalidate the affected entries.
    pub fn with_catalog_cache(mut self, cache: Arc<CatalogCache>) -> Self {
        self.catalog_cache = Some(cache);
        self
    }

    /// Registers a new module name.
    pub async fn create_module(&self, name: &str, created_by: Option<UserId>) -> AppResult<Module> {
        validate_catalog_name(name, "module")?;
        let module = self.catalog_repo.create_module(name, created_by).await?;
        info!(module_id = %module.id, name, "Created module");
        Ok(module)
    }

    /// Registers a new action verb.
    pub async fn create_action(&self, name: &str, created_by: Option<UserId>) -> AppResult<Action> {
        validate_catalog_name(name, "action")?;
        let action = self.catalog_repo.create_action(name, created_by).await?;
        info!(action_id = %action.id, name, "Created action");
        Ok(action)
    }

    /// Creates the permission for a (module, action) pair, resolving both
    /// by name.
    pub async fn create_permission(
        &self,
        module_name: &str,
        action_name: &str,
        description: Option<&str>,
        created_by: Option<UserId>,
    ) -> AppResult<Permission> {
        let module = self
            .catalog_repo
            .find_module_by_name(module_name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Module '{module_name}' not found")))?;
        let action = self
            .catalog_repo
            .find_action_by_name(action_name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Action '{action_name}' not found")))?;

        let permission = self
            .catalog_repo
            .create_permission(module.id, action.id, description, created_by)
            .await?;

        // The cache never stores misses, but drop any stale entry for the
        // pair anyway so a rebuilt catalog converges immediately.
        if let Some(cache) = &self.catalog_cache {
            cache.invalidate(module_name, action_name).await;
        }

        info!(permission_id = %permission.id, name = %permission.name, "Created permission");
        Ok(permission)
    }

    /// Lists all modules.
    pub async fn list_modules(&self) -> AppResult<Vec<Module>> {
        self.catalog_repo.list_modules().await
    }

    /// Lists all actions.
    pub async fn list_actions(&self) -> AppResult<Vec<Action>> {
        self.catalog_repo.list_actions().await
    }

    /// Lists all permissions.
    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.catalog_repo.list_permissions().await
    }
}

/// Catalog names are lowercase identifiers; the `module:action` derived
/// permission name depends on neither part containing a colon.
fn validate_catalog_name(name: &str, what: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::validation(format!("A {what} name cannot be empty")));
    }
    if name.contains(':') || name.contains(char::is_whitespace) {
        return Err(AppError::validation(format!(
            "A {what} name cannot contain ':' or whitespace: '{name}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_catalog_name() {
        assert!(validate_catalog_name("article", "module").is_ok());
        assert!(validate_catalog_name("update_all", "action").is_ok());
        assert!(validate_catalog_name("", "module").is_err());
        assert!(validate_catalog_name("article:read", "module").is_err());
        assert!(validate_catalog_name("two words", "action").is_err());
    }
}

//! Catalog management CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use accesshub_core::error::AppError;
use accesshub_database::repositories::CatalogRepository;
use accesshub_service::CatalogService;

use crate::output::{self, OutputFormat};

/// Arguments for catalog commands
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Catalog subcommand
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog subcommands
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// Register a module
    AddModule {
        /// Module name
        name: String,
    },
    /// Register an action
    AddAction {
        /// Action name
        name: String,
    },
    /// Create the permission for a module/action pair
    AddPermission {
        /// Module name
        module: String,
        /// Action name
        action: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List registered modules
    Modules,
    /// List registered actions
    Actions,
    /// List registered permissions
    Permissions,
}

/// Catalog display row for table output
#[derive(Debug, Serialize, Tabled)]
struct CatalogRow {
    /// Identifier
    id: String,
    /// Name
    name: String,
    /// Created at
    created_at: String,
}

/// Execute catalog commands
pub async fn execute(
    args: &CatalogArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let service = CatalogService::new(Arc::new(CatalogRepository::new(pool)));

    match &args.command {
        CatalogCommand::AddModule { name } => {
            let module = service.create_module(name, None).await?;
            output::print_success(&format!("Module '{}' registered ({})", module.name, module.id));
        }
        CatalogCommand::AddAction { name } => {
            let action = service.create_action(name, None).await?;
            output::print_success(&format!("Action '{}' registered ({})", action.name, action.id));
        }
        CatalogCommand::AddPermission {
            module,
            action,
            description,
        } => {
            let permission = service
                .create_permission(module, action, description.as_deref(), None)
                .await?;
            output::print_success(&format!(
                "Permission '{}' created ({})",
                permission.name, permission.id
            ));
        }
        CatalogCommand::Modules => {
            let rows: Vec<CatalogRow> = service
                .list_modules()
                .await?
                .iter()
                .map(|m| CatalogRow {
                    id: m.id.to_string(),
                    name: m.name.clone(),
                    created_at: m.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        CatalogCommand::Actions => {
            let rows: Vec<CatalogRow> = service
                .list_actions()
                .await?
                .iter()
                .map(|a| CatalogRow {
                    id: a.id.to_string(),
                    name: a.name.clone(),
                    created_at: a.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        CatalogCommand::Permissions => {
            let rows: Vec<CatalogRow> = service
                .list_permissions()
                .await?
                .iter()
                .map(|p| CatalogRow {
                    id: p.id.to_string(),
                    name: p.name.clone(),
                    created_at: p.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

//! Role and role-grant CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use accesshub_core::error::AppError;
use accesshub_database::repositories::{RolePermissionRepository, RoleRepository};
use accesshub_service::RoleGrantService;

use crate::output::{self, OutputFormat};

/// Arguments for role commands
#[derive(Debug, Args)]
pub struct RoleArgs {
    /// Role subcommand
    #[command(subcommand)]
    pub command: RoleCommand,
}

/// Role subcommands
#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// Create a role
    Create {
        /// Role name
        name: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Parent role name (organizational only)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Delete a role
    Delete {
        /// Role name or UUID
        role: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List all roles
    List,
    /// Grant permissions to a role
    Grant {
        /// Role name or UUID
        role: String,
        /// Permission names (`module:action`)
        #[arg(required = true)]
        permissions: Vec<String>,
        /// Granting principal (user UUID or email)
        #[arg(long)]
        granted_by: String,
    },
    /// Revoke permissions from a role
    Revoke {
        /// Role name or UUID
        role: String,
        /// Permission names (`module:action`)
        #[arg(required = true)]
        permissions: Vec<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List a role's grants
    Grants {
        /// Role name or UUID
        role: String,
    },
}

/// Role display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    /// Role ID
    id: String,
    /// Name
    name: String,
    /// Description
    description: String,
    /// Created at
    created_at: String,
}

/// Grant display row for table output
#[derive(Debug, Serialize, Tabled)]
struct GrantRow {
    /// Permission ID
    permission_id: String,
    /// Granted by
    granted_by: String,
    /// Granted at
    granted_at: String,
}

/// Execute role commands
pub async fn execute(
    args: &RoleArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let role_repo = RoleRepository::new(pool.clone());
    let service = RoleGrantService::new(
        pool.clone(),
        Arc::new(RolePermissionRepository::new(pool.clone())),
    );

    match &args.command {
        RoleCommand::Create {
            name,
            description,
            parent,
        } => {
            let parent_role_id = match parent {
                Some(parent) => Some(super::resolve_role(&pool, parent).await?.id),
                None => None,
            };
            let role = role_repo
                .create(name, description.as_deref(), parent_role_id, None)
                .await?;
            output::print_success(&format!("Role '{}' created ({})", role.name, role.id));
        }
        RoleCommand::Delete { role, yes } => {
            let role = super::resolve_role(&pool, role).await?;
            if !yes && !confirm(&format!("Delete role '{}' and all its grants?", role.name))? {
                println!("Aborted.");
                return Ok(());
            }
            role_repo.delete(role.id).await?;
            output::print_success(&format!("Role '{}' deleted", role.name));
        }
        RoleCommand::List => {
            let rows: Vec<RoleRow> = role_repo
                .list()
                .await?
                .iter()
                .map(|r| RoleRow {
                    id: r.id.to_string(),
                    name: r.name.clone(),
                    description: r.description.clone().unwrap_or_default(),
                    created_at: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        RoleCommand::Grant {
            role,
            permissions,
            granted_by,
        } => {
            let role = super::resolve_role(&pool, role).await?;
            let granted_by = super::resolve_user(&pool, granted_by).await?;
            let permission_ids = super::resolve_permission_ids(&pool, permissions).await?;
            let granted = service
                .assign(role.id, &permission_ids, granted_by.id)
                .await?;
            output::print_success(&format!(
                "Granted {} permission(s) to role '{}'",
                granted.len(),
                role.name
            ));
        }
        RoleCommand::Revoke {
            role,
            permissions,
            yes,
        } => {
            let role = super::resolve_role(&pool, role).await?;
            if !yes
                && !confirm(&format!(
                    "Revoke {} permission(s) from role '{}'?",
                    permissions.len(),
                    role.name
                ))?
            {
                println!("Aborted.");
                return Ok(());
            }
            let permission_ids = super::resolve_permission_ids(&pool, permissions).await?;
            let revoked = service.revoke(role.id, &permission_ids).await?;
            output::print_success(&format!(
                "Revoked {} permission(s) from role '{}'",
                revoked, role.name
            ));
        }
        RoleCommand::Grants { role } => {
            let role = super::resolve_role(&pool, role).await?;
            let rows: Vec<GrantRow> = service
                .list(role.id)
                .await?
                .iter()
                .map(|g| GrantRow {
                    permission_id: g.permission_id.to_string(),
                    granted_by: g
                        .granted_by
                        .map(|u| u.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    granted_at: g.granted_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, AppError> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Failed to read confirmation: {e}")))
}

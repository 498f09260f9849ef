//! Object-level grant CLI commands.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use accesshub_core::error::AppError;
use accesshub_database::repositories::{
    CatalogRepository, ObjectPermissionRepository, ResourceRepository,
};
use accesshub_service::{ObjectGrantService, ResourceRegistry};

use crate::output::{self, OutputFormat};

/// Arguments for object grant commands
#[derive(Debug, Args)]
pub struct ObjectArgs {
    /// Object subcommand
    #[command(subcommand)]
    pub command: ObjectCommand,
}

/// Object subcommands
#[derive(Debug, Subcommand)]
pub enum ObjectCommand {
    /// Grant permissions on one specific entity
    Grant {
        /// User UUID or email
        user: String,
        /// Module name
        module: String,
        /// Resource token (the entity's identifier in its module)
        resource: String,
        /// Permission names (`module:action`)
        #[arg(required = true)]
        permissions: Vec<String>,
        /// Granting principal (user UUID or email)
        #[arg(long)]
        granted_by: String,
        /// Expiration (RFC 3339, e.g. 2027-01-01T00:00:00Z)
        #[arg(long)]
        expires: Option<String>,
    },
    /// Revoke permissions on one specific entity
    Revoke {
        /// User UUID or email
        user: String,
        /// Module name
        module: String,
        /// Resource token
        resource: String,
        /// Permission names (`module:action`)
        #[arg(required = true)]
        permissions: Vec<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List a user's object grants
    List {
        /// User UUID or email
        user: String,
    },
}

/// Object grant display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ObjectGrantRow {
    /// Resource ID
    resource_id: String,
    /// Permission ID
    permission_id: String,
    /// Granted at
    granted_at: String,
    /// Expires at
    expires_at: String,
}

/// Execute object grant commands
pub async fn execute(
    args: &ObjectArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let service = ObjectGrantService::new(
        pool.clone(),
        Arc::new(ObjectPermissionRepository::new(pool.clone())),
        ResourceRegistry::new(Arc::new(ResourceRepository::new(pool.clone()))),
    );

    match &args.command {
        ObjectCommand::Grant {
            user,
            module,
            resource,
            permissions,
            granted_by,
            expires,
        } => {
            let user = super::resolve_user(&pool, user).await?;
            let granted_by = super::resolve_user(&pool, granted_by).await?;
            let module = find_module(&pool, module).await?;
            let permission_ids = super::resolve_permission_ids(&pool, permissions).await?;
            let expires_at = expires.as_deref().map(parse_expiry).transpose()?;

            let granted = service
                .assign(
                    user.id,
                    module,
                    resource,
                    &permission_ids,
                    granted_by.id,
                    expires_at,
                )
                .await?;
            output::print_success(&format!(
                "Granted {} permission(s) to '{}' on resource '{}'",
                granted.len(),
                user.email,
                resource
            ));
        }
        ObjectCommand::Revoke {
            user,
            module,
            resource,
            permissions,
            yes,
        } => {
            let user = super::resolve_user(&pool, user).await?;
            if !yes
                && !confirm(&format!(
                    "Revoke {} permission(s) from '{}' on resource '{}'?",
                    permissions.len(),
                    user.email,
                    resource
                ))?
            {
                println!("Aborted.");
                return Ok(());
            }
            let module = find_module(&pool, module).await?;
            let permission_ids = super::resolve_permission_ids(&pool, permissions).await?;
            let revoked = service
                .revoke(user.id, module, resource, &permission_ids)
                .await?;
            output::print_success(&format!(
                "Revoked {} permission(s) from '{}' on resource '{}'",
                revoked, user.email, resource
            ));
        }
        ObjectCommand::List { user } => {
            let user = super::resolve_user(&pool, user).await?;
            let rows: Vec<ObjectGrantRow> = service
                .list(user.id)
                .await?
                .iter()
                .map(|g| ObjectGrantRow {
                    resource_id: g.resource_id.to_string(),
                    permission_id: g.permission_id.to_string(),
                    granted_at: g.granted_at.format("%Y-%m-%d %H:%M").to_string(),
                    expires_at: g
                        .expires_at
                        .map(|e| e.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "never".to_string()),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

async fn find_module(
    pool: &sqlx::PgPool,
    name: &str,
) -> Result<accesshub_core::types::ModuleId, AppError> {
    CatalogRepository::new(pool.clone())
        .find_module_by_name(name)
        .await?
        .map(|m| m.id)
        .ok_or_else(|| AppError::not_found(format!("Module '{name}' not found")))
}

fn parse_expiry(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::validation(format!("Invalid expiry '{raw}': {e}")))
}

fn confirm(prompt: &str) -> Result<bool, AppError> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Failed to read confirmation: {e}")))
}

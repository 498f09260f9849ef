//! User grant and membership CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use accesshub_core::error::AppError;
use accesshub_database::repositories::{
    MembershipRepository, UserPermissionRepository, UserRepository,
};
use accesshub_service::{MembershipService, UserGrantService};

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user principal
    Create {
        /// Email address
        email: String,
        /// First name
        #[arg(long)]
        first_name: Option<String>,
        /// Last name
        #[arg(long)]
        last_name: Option<String>,
    },
    /// List all users
    List,
    /// Grant permissions directly to a user
    Grant {
        /// User UUID or email
        user: String,
        /// Permission names (`module:action`)
        #[arg(required = true)]
        permissions: Vec<String>,
        /// Granting principal (user UUID or email)
        #[arg(long)]
        granted_by: String,
    },
    /// Revoke direct permissions from a user
    Revoke {
        /// User UUID or email
        user: String,
        /// Permission names (`module:action`)
        #[arg(required = true)]
        permissions: Vec<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List a user's direct grants
    Grants {
        /// User UUID or email
        user: String,
    },
    /// Assign a role to a user
    AssignRole {
        /// User UUID or email
        user: String,
        /// Role name or UUID
        role: String,
        /// Assigning principal (user UUID or email)
        #[arg(long)]
        assigned_by: String,
    },
    /// Remove a role from a user
    DeassignRole {
        /// User UUID or email
        user: String,
        /// Role name or UUID
        role: String,
    },
    /// List a user's role memberships
    Roles {
        /// User UUID or email
        user: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Email
    email: String,
    /// Name
    name: String,
    /// Active
    active: bool,
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

/// Membership display row for table output
#[derive(Debug, Serialize, Tabled)]
struct MembershipRow {
    /// Role ID
    role_id: String,
    /// Assigned by
    assigned_by: String,
    /// Assigned at
    assigned_at: String,
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let grant_service = UserGrantService::new(
        pool.clone(),
        Arc::new(UserPermissionRepository::new(pool.clone())),
    );
    let membership_service =
        MembershipService::new(Arc::new(MembershipRepository::new(pool.clone())));

    match &args.command {
        UserCommand::Create {
            email,
            first_name,
            last_name,
        } => {
            let user = UserRepository::new(pool.clone())
                .create(email, first_name.as_deref(), last_name.as_deref())
                .await?;
            output::print_success(&format!("User '{}' created ({})", user.email, user.id));
        }
        UserCommand::List => {
            let rows: Vec<UserRow> = UserRepository::new(pool.clone())
                .list()
                .await?
                .iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    email: u.email.clone(),
                    name: format!(
                        "{} {}",
                        u.first_name.clone().unwrap_or_default(),
                        u.last_name.clone().unwrap_or_default()
                    )
                    .trim()
                    .to_string(),
                    active: u.is_active,
                })
                .collect();
            output::print_list(&rows, format);
        }
        UserCommand::Grant {
            user,
            permissions,
            granted_by,
        } => {
            let user = super::resolve_user(&pool, user).await?;
            let granted_by = super::resolve_user(&pool, granted_by).await?;
            let permission_ids = super::resolve_permission_ids(&pool, permissions).await?;
            let granted = grant_service
                .assign(user.id, &permission_ids, granted_by.id)
                .await?;
            output::print_success(&format!(
                "Granted {} permission(s) to '{}'",
                granted.len(),
                user.email
            ));
        }
        UserCommand::Revoke {
            user,
            permissions,
            yes,
        } => {
            let user = super::resolve_user(&pool, user).await?;
            if !yes
                && !confirm(&format!(
                    "Revoke {} permission(s) from '{}'?",
                    permissions.len(),
                    user.email
                ))?
            {
                println!("Aborted.");
                return Ok(());
            }
            let permission_ids = super::resolve_permission_ids(&pool, permissions).await?;
            let revoked = grant_service.revoke(user.id, &permission_ids).await?;
            output::print_success(&format!(
                "Revoked {} permission(s) from '{}'",
                revoked, user.email
            ));
        }
        UserCommand::Grants { user } => {
            let user = super::resolve_user(&pool, user).await?;
            let rows: Vec<GrantRow> = grant_service
                .list(user.id)
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
        UserCommand::AssignRole {
            user,
            role,
            assigned_by,
        } => {
            let user = super::resolve_user(&pool, user).await?;
            let role = super::resolve_role(&pool, role).await?;
            let assigned_by = super::resolve_user(&pool, assigned_by).await?;
            membership_service
                .assign(user.id, role.id, assigned_by.id)
                .await?;
            output::print_success(&format!(
                "Assigned role '{}' to '{}'",
                role.name, user.email
            ));
        }
        UserCommand::DeassignRole { user, role } => {
            let user = super::resolve_user(&pool, user).await?;
            let role = super::resolve_role(&pool, role).await?;
            membership_service.deassign(user.id, role.id).await?;
            output::print_success(&format!(
                "Removed role '{}' from '{}'",
                role.name, user.email
            ));
        }
        UserCommand::Roles { user } => {
            let user = super::resolve_user(&pool, user).await?;
            let rows: Vec<MembershipRow> = membership_service
                .list(user.id)
                .await?
                .iter()
                .map(|m| MembershipRow {
                    role_id: m.role_id.to_string(),
                    assigned_by: m
                        .assigned_by
                        .map(|u| u.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    assigned_at: m.assigned_at.format("%Y-%m-%d %H:%M").to_string(),
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

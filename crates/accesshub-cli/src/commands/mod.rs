//! CLI command definitions and dispatch.

pub mod catalog;
pub mod check;
pub mod migrate;
pub mod object;
pub mod role;
pub mod user;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use accesshub_core::config::AppConfig;
use accesshub_core::error::AppError;
use accesshub_core::types::PermissionId;
use accesshub_database::repositories::{CatalogRepository, RoleRepository, UserRepository};
use accesshub_entity::{Role, User};

use crate::output::OutputFormat;

/// AccessHub — RBAC and object-level authorization management
#[derive(Debug, Parser)]
#[command(name = "accesshub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate an authorization check
    Check(check::CheckArgs),
    /// Catalog management (modules, actions, permissions)
    Catalog(catalog::CatalogArgs),
    /// Role and role-grant management
    Role(role::RoleArgs),
    /// User grants and role memberships
    User(user::UserArgs),
    /// Object-level grant management
    Object(object::ObjectArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Check(args) => check::execute(args, &self.config).await,
            Commands::Catalog(args) => catalog::execute(args, &self.config, self.format).await,
            Commands::Role(args) => role::execute(args, &self.config, self.format).await,
            Commands::User(args) => user::execute(args, &self.config, self.format).await,
            Commands::Object(args) => object::execute(args, &self.config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<sqlx::PgPool, AppError> {
    let pool = accesshub_database::DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

/// Helper: resolve a principal given either a user UUID or an email.
pub async fn resolve_user(pool: &sqlx::PgPool, principal: &str) -> Result<User, AppError> {
    let user_repo = UserRepository::new(pool.clone());
    let user = if let Ok(id) = Uuid::parse_str(principal) {
        user_repo.find_by_id(id.into()).await?
    } else {
        user_repo.find_by_email(principal).await?
    };
    user.ok_or_else(|| AppError::not_found(format!("User '{principal}' not found")))
}

/// Helper: resolve a role given either a role UUID or its name.
pub async fn resolve_role(pool: &sqlx::PgPool, role: &str) -> Result<Role, AppError> {
    let role_repo = RoleRepository::new(pool.clone());
    let found = if let Ok(id) = Uuid::parse_str(role) {
        role_repo.find_by_id(id.into()).await?
    } else {
        role_repo.find_by_name(role).await?
    };
    found.ok_or_else(|| AppError::not_found(format!("Role '{role}' not found")))
}

/// Helper: resolve `module:action` permission names to identifiers.
pub async fn resolve_permission_ids(
    pool: &sqlx::PgPool,
    names: &[String],
) -> Result<Vec<PermissionId>, AppError> {
    let catalog_repo = CatalogRepository::new(pool.clone());
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let permission = catalog_repo
            .find_permission_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Permission '{name}' not found")))?;
        ids.push(permission.id);
    }
    Ok(ids)
}

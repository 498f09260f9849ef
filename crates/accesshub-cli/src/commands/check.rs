//! Authorization check command.

use std::sync::Arc;

use clap::Args;

use accesshub_authz::{CatalogCache, DecisionEngine};
use accesshub_core::error::AppError;
use accesshub_core::types::{Decision, GrantSource};
use accesshub_database::PgDecisionStore;

use crate::output;

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Principal to check (user UUID or email)
    pub principal: String,
    /// Module name
    pub module: String,
    /// Action name
    pub action: String,
    /// Resource token for an object-scoped check
    #[arg(short, long)]
    pub resource: Option<String>,
}

/// Execute the check command
pub async fn execute(args: &CheckArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let user = super::resolve_user(&pool, &args.principal).await?;

    let store = Arc::new(PgDecisionStore::new(pool));
    let mut engine = DecisionEngine::new(store);
    if config.cache.enabled {
        engine = engine.with_catalog_cache(Arc::new(CatalogCache::new(&config.cache)));
    }

    let decision = engine
        .authorize(user.id, &args.module, &args.action, args.resource.as_deref())
        .await?;

    match decision {
        Decision::Allow { source } => {
            let via = match source {
                GrantSource::Direct => "direct grant",
                GrantSource::Role => "role grant",
                GrantSource::Object => "object grant",
            };
            output::print_success(&format!(
                "ALLOW {}:{} for {} (via {})",
                args.module, args.action, args.principal, via
            ));
        }
        Decision::Deny { .. } => {
            println!("DENY {}:{} for {}", args.module, args.action, args.principal);
            output::print_kv("principal", &user.id.to_string());
            if let Some(resource) = &args.resource {
                output::print_kv("resource", resource);
            }
        }
    }

    Ok(())
}

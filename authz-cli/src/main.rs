use anyhow::{bail, Context, Result};
use auth_identity::{CredentialHasher, IdentityConfig};
use auth_rbac::{
    seed::defaults::ROOT_GROUP, AuthzService, AuthzStore, Decision, InMemoryAuthzStore, PostgresAuthzStore,
    RbacConfig, SeedBootstrapper, StepStatus,
};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use database_layer::{DatabasePool, PoolSettings};
use std::{env, sync::Arc};
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Seed and query the role-based authorization core
#[derive(Parser, Debug)]
#[command(name = "authz")]
#[command(about = "Seed and query pipeline authorization records")]
struct Args {
    /// PostgreSQL connection URL. Without one an in-memory store is used,
    /// which only lives for this invocation.
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Log output format
    #[arg(long, value_enum, env = "AUTHZ_LOG_FORMAT", default_value = "pretty", global = true)]
    log_format: LogFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the baseline group, administrator, catalog and roles
    Seed,

    /// Decide whether a user may perform an operation
    Check {
        /// Username to check
        #[arg(short, long)]
        user: String,
        /// Resource type, e.g. `pipeline`
        resource_type: String,
        /// Operation name, e.g. `PipelineCreate`
        operation_name: String,
    },

    /// List the roles defined in a group
    Roles {
        /// Group name
        #[arg(short, long, default_value = ROOT_GROUP)]
        group: String,
        /// Parent id of the group; 0 for a root group
        #[arg(long, default_value_t = 0)]
        parent: i64,
    },

    /// List every operation a user is granted
    Permissions {
        /// Username
        #[arg(short, long)]
        user: String,
    },

    /// Attach users to a role within a group
    Bundle {
        /// Group name
        #[arg(short, long, default_value = ROOT_GROUP)]
        group: String,
        /// Parent id of the group; 0 for a root group
        #[arg(long, default_value_t = 0)]
        parent: i64,
        /// Role name
        #[arg(short, long)]
        role: String,
        /// Usernames to attach; all must exist
        #[arg(required = true)]
        users: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(args.verbose, args.log_format)?;

    let store = open_store(args.database_url.as_deref()).await?;
    let authz = AuthzService::new(store, &RbacConfig::from_env()?)?;
    let hasher = CredentialHasher::new(&IdentityConfig::from_env()?)?;

    // Privileged commands always run after the bootstrap
    let seeder = SeedBootstrapper::new(authz.clone(), hasher);
    let report = seeder.run().await;

    match args.command {
        Command::Seed => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(report)?);
            } else {
                for step in &report.steps {
                    let status = match &step.status {
                        StepStatus::Completed => "completed".bright_green(),
                        StepStatus::Skipped(reason) => format!("skipped: {}", reason).bright_yellow(),
                        StepStatus::Failed(error) => format!("failed: {}", error).bright_red(),
                    };
                    println!("{:<24} {}", step.step.to_string().bright_white(), status);
                }
            }
        }

        Command::Check {
            user,
            resource_type,
            operation_name,
        } => {
            let decision = authz
                .engine()
                .authorize_user(&user, &resource_type, &operation_name)
                .await;
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "user": user,
                        "resource_type": resource_type,
                        "operation_name": operation_name,
                        "decision": decision,
                    })
                );
            } else {
                let rendered = match decision {
                    Decision::Allow => decision.to_string().bright_green(),
                    Decision::Deny => decision.to_string().bright_red(),
                };
                println!("{} {}:{} -> {}", user, resource_type, operation_name, rendered);
            }
        }

        Command::Roles { group, parent } => {
            let group = authz
                .groups()
                .find(&group, parent)
                .await?
                .with_context(|| format!("group '{}' under parent {} not found", group, parent))?;
            let roles = authz.roles().list(group.id).await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&roles)?);
            } else {
                for role in roles {
                    println!(
                        "{:<16} {:>4} operations  {}",
                        role.name.bright_white(),
                        role.operations.len(),
                        role.description.dimmed()
                    );
                }
            }
        }

        Command::Permissions { user } => {
            let found = authz
                .store()
                .find_user_by_name(&user)
                .await?
                .with_context(|| format!("user '{}' not found", user))?;
            let operations = authz.engine().effective_permissions(found.id).await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&operations)?);
            } else if operations.is_empty() {
                println!("{}", "no operations granted".dimmed());
            } else {
                for op in operations {
                    println!("{}", op);
                }
            }
        }

        Command::Bundle {
            group,
            parent,
            role,
            users,
        } => {
            let group = authz
                .groups()
                .find(&group, parent)
                .await?
                .with_context(|| format!("group '{}' under parent {} not found", group, parent))?;
            let Some(found) = authz.roles().find(group.id, &role).await? else {
                bail!("role '{}' not found in group '{}'", role, group.name);
            };

            authz.bundles().bundle(group.id, found.id, &users).await?;
            info!(group = %group, role = %found.name, users = users.len(), "Bundle updated");
            println!("{} {} user(s) bundled to {}", "✓".bright_green(), users.len(), found.name);
        }
    }

    Ok(())
}

async fn open_store(database_url: Option<&str>) -> Result<Arc<dyn AuthzStore>> {
    match database_url {
        Some(url) => {
            let pool = DatabasePool::new(url, &PoolSettings::from_env()?)
                .await
                .context("Failed to connect to the authorization database")?;
            Ok(Arc::new(PostgresAuthzStore::new(pool.pool().clone())))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using an in-memory store");
            Ok(Arc::new(InMemoryAuthzStore::new()))
        }
    }
}

fn default_filter(level: Level) -> String {
    format!("authz={level},auth_rbac={level},auth_identity={level},database_layer={level},sqlx=warn")
}

fn init_tracing(verbose: bool, format: LogFormat) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into());

    let use_colors = env::var("NO_COLOR").is_err() && atty::is(atty::Stream::Stderr);

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_timer(fmt::time::ChronoUtc::rfc_3339())
                    .with_ansi(use_colors),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_timer(fmt::time::ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init(),
    }
    .context("Failed to initialize tracing")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_every_workspace_crate() {
        let filter = default_filter(Level::DEBUG);
        for target in ["authz", "auth_rbac", "auth_identity", "database_layer"] {
            assert!(filter.contains(&format!("{target}=DEBUG")), "{filter}");
        }
        assert!(filter.contains("sqlx=warn"));
    }
}

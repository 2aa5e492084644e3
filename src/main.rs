//! rbac-gate administration CLI
//!
//! Works directly against the configured directory database.

#![allow(missing_docs)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use rbac_gate::storage::seed;
use rbac_gate::{AuditLogger, AuthSystem, Config, Directory, SeaOrmDirectory};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "rbac-gate", version, about = "Authentication and RBAC administration")]
struct Cli {
    /// YAML configuration file; the environment is used when omitted
    #[arg(short, long, env = "RBAC_GATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run migrations, seed the catalog and create the bootstrap admin
    Init,
    /// Register an account with the default role
    Register {
        username: String,
        email: String,
        #[arg(long, env = "RBAC_GATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Exchange credentials for a bearer token
    Login {
        username: String,
        #[arg(long, env = "RBAC_GATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the identity behind a token
    Whoami { token: String },
    /// Check whether a token's holder has a permission
    Check { token: String, permission: String },
    /// List roles with their grants
    Roles,
    /// List the permission catalog
    Permissions,
    /// Show the most recent audit entries
    Audit {
        #[arg(short, long, default_value_t = 10)]
        limit: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path).await?,
        None => Config::from_env()?,
    };
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(cli.config.as_ref())
        .await
        .context("Failed to load configuration")?;
    rbac_gate::utils::logging::init(&config.logging);

    let directory = SeaOrmDirectory::connect(&config.storage.database)
        .await
        .context("Failed to connect to the directory database")?;
    directory.migrate().await.context("Failed to run migrations")?;
    let directory: Arc<dyn Directory> = Arc::new(directory);

    let auth = AuthSystem::new(&config.auth, directory.clone())?;

    match cli.command {
        Command::Init => {
            let report = seed::initialize(directory.as_ref(), &config.auth).await?;
            info!("Initialization complete");
            println!(
                "permissions created: {}, roles created: {}, grants added: {}",
                report.permissions_created, report.roles_created, report.grants_added
            );
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let user = auth.register(&username, &email, &password).await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::Login { username, password } => {
            let token = auth.login(&username, &password).await?;
            println!("{}", serde_json::to_string_pretty(&token)?);
        }
        Command::Whoami { token } => {
            let ctx = auth.resolve(&token, None).await?;
            let permissions = auth.rbac().get_user_permissions(ctx.user_id()).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "user": ctx.user,
                    "permissions": permissions,
                }))?
            );
        }
        Command::Check { token, permission } => {
            let ctx = auth.resolve(&token, None).await?;
            let allowed = auth
                .rbac()
                .check_permission(ctx.user_id(), &permission)
                .await?;
            println!("{}", if allowed { "allowed" } else { "denied" });
            if !allowed {
                return Ok(ExitCode::from(2));
            }
        }
        Command::Roles => {
            for details in auth.rbac().list_roles().await? {
                println!(
                    "{:<4} {:<16} users={:<4} {}",
                    details.role.id,
                    details.role.name,
                    details.user_count,
                    details.permission_names().join(",")
                );
            }
        }
        Command::Permissions => {
            for permission in auth.rbac().list_permissions().await? {
                println!("{:<12} {}", permission.category, permission.name);
            }
        }
        Command::Audit { limit } => {
            let logger = AuditLogger::new(directory.clone());
            for entry in logger.recent(limit).await? {
                println!(
                    "{} {:<12} {:<12} {}:{} {}",
                    entry.created_at.to_rfc3339(),
                    entry.username.as_deref().unwrap_or("-"),
                    entry.action,
                    entry.entity_type,
                    entry
                        .entity_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    entry.details.as_deref().unwrap_or("")
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}


use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use reqwest::header::AUTHORIZATION;
use roles::wire::{self, AdminUser, RoleUpdate, SyncRequest};
use roles::{AdminActionError, DEFAULT_API_URL, REQUEST_TIMEOUT_MS, Role, RoleSyncError};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing ID token; pass --token or set CLINICAL_ID_TOKEN")]
    MissingToken,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Sync(#[from] RoleSyncError),
    #[error(transparent)]
    Admin(#[from] AdminActionError),
    #[error("no user with email {0}")]
    UserNotFound(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "clinical-cli", about = "Clinical Connect backend and role administration CLI")]
struct Cli {
    #[arg(long, env = "CLINICAL_API_URL", default_value = DEFAULT_API_URL)]
    base_url: String,

    /// Identity-provider ID token sent as the bearer credential.
    #[arg(long, env = "CLINICAL_ID_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check backend liveness.
    Health,
    /// Sync the token's user and print the backend-assigned role.
    Whoami {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Inspect and manage user roles (SUPER_ADMIN token required).
    Users(UsersCommand),
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    /// Print every user with their stored role.
    List,
    /// Print the user with this email.
    Find {
        email: String,
    },
    /// Assign a role to the user with this uid.
    SetRole {
        uid: String,
        #[arg(value_parser = parse_role)]
        role: Role,
    },
    /// Grant SUPER_ADMIN to the user with this email.
    Promote {
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(u64::from(REQUEST_TIMEOUT_MS)))
        .build()?;
    let ctx = CliContext { base_url: cli.base_url, token: cli.token, client };

    match cli.command {
        Command::Health => run_health(&ctx).await,
        Command::Whoami { email, display_name } => run_whoami(&ctx, SyncRequest { email, display_name }).await,
        Command::Users(users) => run_users(&ctx, users).await,
    }
}

async fn run_health(cli: &CliContext) -> Result<(), CliError> {
    let response = cli.client.get(wire::endpoint(&cli.base_url, wire::HEALTH_PATH)).send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    let health = wire::parse_health(status, &body)?;
    println!("{} (firebase connected: {})", health.status, health.firebase_connected);
    Ok(())
}

async fn run_whoami(cli: &CliContext, request: SyncRequest) -> Result<(), CliError> {
    let token = cli.token()?;
    let response = cli
        .client
        .post(wire::endpoint(&cli.base_url, wire::SYNC_PATH))
        .header(AUTHORIZATION, wire::bearer(token))
        .json(&request)
        .send()
        .await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    let role = wire::parse_sync_response(status, &body)?;
    println!("{role}");
    Ok(())
}

async fn run_users(cli: &CliContext, users: UsersCommand) -> Result<(), CliError> {
    match users.command {
        UsersSubcommand::List => {
            let users = list_users(cli).await?;
            print_json(&serde_json::to_value(&users)?)
        }
        UsersSubcommand::Find { email } => {
            let users = list_users(cli).await?;
            let user = find_by_email(&users, &email).ok_or(CliError::UserNotFound(email))?;
            print_json(&serde_json::to_value(user)?)
        }
        UsersSubcommand::SetRole { uid, role } => {
            let message = set_role(cli, &uid, role).await?;
            println!("{message}");
            Ok(())
        }
        UsersSubcommand::Promote { email } => {
            let users = list_users(cli).await?;
            let user = find_by_email(&users, &email).ok_or_else(|| CliError::UserNotFound(email.clone()))?;
            if user.known_role() == Some(Role::SuperAdmin) {
                println!("{} is already {}", user.display_label(), Role::SuperAdmin);
                return Ok(());
            }
            let message = set_role(cli, &user.uid, Role::SuperAdmin).await?;
            println!("{message}");
            Ok(())
        }
    }
}

async fn list_users(cli: &CliContext) -> Result<Vec<AdminUser>, CliError> {
    let token = cli.token()?;
    let response = cli
        .client
        .get(wire::endpoint(&cli.base_url, wire::ADMIN_USERS_PATH))
        .header(AUTHORIZATION, wire::bearer(token))
        .send()
        .await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(wire::parse_admin_users(status, &body)?)
}

async fn set_role(cli: &CliContext, uid: &str, role: Role) -> Result<String, CliError> {
    let token = cli.token()?;
    let response = cli
        .client
        .put(wire::endpoint(&cli.base_url, &wire::user_role_path(uid)))
        .header(AUTHORIZATION, wire::bearer(token))
        .json(&RoleUpdate { role })
        .send()
        .await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(wire::parse_role_update(status, &body)?)
}

impl CliContext {
    fn token(&self) -> Result<&str, CliError> {
        self.token.as_deref().filter(|t| !t.trim().is_empty()).ok_or(CliError::MissingToken)
    }
}

/// Validate a role label before anything is sent.
fn parse_role(raw: &str) -> Result<Role, String> {
    raw.trim().to_ascii_uppercase().parse::<Role>().map_err(|e| {
        let known: Vec<&str> = Role::ALL.iter().map(|role| role.as_str()).collect();
        format!("{e}; expected one of {}", known.join(", "))
    })
}

/// Email match is case-insensitive.
fn find_by_email<'a>(users: &'a [AdminUser], email: &str) -> Option<&'a AdminUser> {
    let wanted = email.trim();
    users
        .iter()
        .find(|user| user.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(wanted)))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

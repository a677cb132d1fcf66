//! CLI command definitions and dispatch.

pub mod auth;
pub mod user;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use staffhub_core::config::AppConfig;
use staffhub_core::error::AppError;
use staffhub_session::AccessDecision;

use crate::context::ClientContext;
use crate::output::{self, OutputFormat};

/// StaffHub — Employee Portal Client
#[derive(Debug, Parser)]
#[command(name = "staffhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

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
    /// Log in to the portal
    Login(auth::LoginArgs),
    /// Log out and clear the local session
    Logout,
    /// Register a new account
    Register(auth::RegisterArgs),
    /// Show the signed-in user
    Whoami,
    /// User directory management
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Login(args) => auth::login(args, config).await,
            Commands::Logout => auth::logout(config).await,
            Commands::Register(args) => auth::register(args, config, self.format).await,
            Commands::Whoami => auth::whoami(config, self.format).await,
            Commands::User(args) => user::execute(args, config, self.format).await,
        }
    }
}

/// Helper: refuse to run an authenticated command without a login session
pub(crate) async fn ensure_logged_in(context: &ClientContext) -> Result<(), AppError> {
    match context.guard.check().await? {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny { message } => {
            output::print_warning("Run 'staffhub login' to sign in.");
            Err(AppError::authentication(message))
        }
    }
}

/// Helper: read a value from a flag, prompting when absent
pub(crate) fn prompt_if_missing(value: Option<&String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {}", e))),
    }
}

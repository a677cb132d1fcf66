//! Authentication commands: login, logout, register, whoami.

use clap::Args;

use staffhub_client::dto::{LoginRequest, RegisterRequest};
use staffhub_core::config::AppConfig;
use staffhub_core::error::AppError;

use crate::context::ClientContext;
use crate::output::{self, OutputFormat};

/// Arguments for the login command
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (will prompt if not provided)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for the register command
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// First name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// Desired username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Email address the generated password is sent to
    #[arg(short, long)]
    pub email: Option<String>,
}

/// Execute the login command
pub async fn login(args: &LoginArgs, config: AppConfig) -> Result<(), AppError> {
    let context = ClientContext::new(config)?;

    let username = super::prompt_if_missing(args.username.as_ref(), "Username")?;
    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
    };

    let request = LoginRequest { username, password };
    let user = context.auth.login(&request).await?;

    output::print_success(&format!("Logged in as {} ({})", user.username, user.full_name()));
    Ok(())
}

/// Execute the logout command
pub async fn logout(config: AppConfig) -> Result<(), AppError> {
    let context = ClientContext::new(config)?;
    context.manager.log_out().await?;
    output::print_success("You've been successfully logged out.");
    Ok(())
}

/// Execute the register command
pub async fn register(
    args: &RegisterArgs,
    config: AppConfig,
    _format: OutputFormat,
) -> Result<(), AppError> {
    let context = ClientContext::new(config)?;

    let request = RegisterRequest {
        first_name: super::prompt_if_missing(args.first_name.as_ref(), "First name")?,
        last_name: super::prompt_if_missing(args.last_name.as_ref(), "Last name")?,
        username: super::prompt_if_missing(args.username.as_ref(), "Username")?,
        email: super::prompt_if_missing(args.email.as_ref(), "Email")?,
    };

    let user = context.auth.register(&request).await?;

    output::print_success(&format!(
        "A new account was created for {}. Please check your email for password to log in.",
        user.first_name
    ));
    Ok(())
}

/// Execute the whoami command
///
/// Reports the session state without failing, so it is usable as a
/// status probe before other commands.
pub async fn whoami(config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let context = ClientContext::new(config)?;

    if !context.manager.is_logged_in().await? {
        output::print_warning("Not logged in.");
        output::print_warning("Run 'staffhub login' to sign in.");
        return Ok(());
    }

    let Some(user) = context.manager.user().await? else {
        output::print_warning("Session token is valid but no profile is cached.");
        output::print_warning("Run 'staffhub login' to refresh it.");
        return Ok(());
    };

    if format == OutputFormat::Json {
        output::print_item(&user, format);
        return Ok(());
    }

    println!("Signed in to {}", context.config.api.normalized_base_url());
    output::print_kv("User ID", &user.user_id);
    output::print_kv("Name", &user.full_name());
    output::print_kv("Username", &user.username);
    output::print_kv("Email", &user.email);
    output::print_kv("Role", user.role.as_str());
    output::print_kv("Authorities", &user.authorities.join(", "));
    if let Some(last_login) = user.last_login_date_display {
        output::print_kv(
            "Last login",
            &last_login.format("%Y-%m-%d %H:%M").to_string(),
        );
    }
    if let Some(claims) = context.manager.claims().await? {
        if let Some(expires) = claims.expires_at() {
            output::print_kv(
                "Token expires",
                &expires.format("%Y-%m-%d %H:%M UTC").to_string(),
            );
        }
    }
    Ok(())
}

//! User directory CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tokio::sync::mpsc;

use staffhub_client::UploadEvent;
use staffhub_client::dto::UserForm;
use staffhub_core::config::AppConfig;
use staffhub_core::error::AppError;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_entity::user::{User, UserRole};

use crate::context::ClientContext;
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
    /// Fetch the directory from the portal and list it
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u64,

        /// Users per page
        #[arg(long, default_value_t = 25)]
        page_size: u64,
    },
    /// Search the cached directory
    Search {
        /// Term matched against first name, last name, username, and user ID
        term: String,
    },
    /// Add a new user
    Add {
        /// First name (will prompt if not provided)
        #[arg(long)]
        first_name: Option<String>,

        /// Last name (will prompt if not provided)
        #[arg(long)]
        last_name: Option<String>,

        /// Username (will prompt if not provided)
        #[arg(short, long)]
        username: Option<String>,

        /// Email address (will prompt if not provided)
        #[arg(short, long)]
        email: Option<String>,

        /// Role to assign
        #[arg(short, long, default_value = "user")]
        role: UserRole,

        /// Create the account in the inactive state
        #[arg(long)]
        inactive: bool,

        /// Create the account in the locked state
        #[arg(long)]
        locked: bool,

        /// Profile image to attach
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// Update an existing user
    Update {
        /// Username of the record to change
        username: String,

        /// New first name
        #[arg(long)]
        first_name: Option<String>,

        /// New last name
        #[arg(long)]
        last_name: Option<String>,

        /// New username
        #[arg(long)]
        new_username: Option<String>,

        /// New email address
        #[arg(short, long)]
        email: Option<String>,

        /// New role
        #[arg(short, long)]
        role: Option<UserRole>,

        /// Set the active state
        #[arg(long)]
        active: Option<bool>,

        /// Set the locked state
        #[arg(long)]
        locked: Option<bool>,

        /// Profile image to attach
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// Update the signed-in user's own profile
    UpdateProfile {
        /// New first name
        #[arg(long)]
        first_name: Option<String>,

        /// New last name
        #[arg(long)]
        last_name: Option<String>,

        /// New username
        #[arg(short, long)]
        username: Option<String>,

        /// New email address
        #[arg(short, long)]
        email: Option<String>,

        /// Profile image to attach
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// Delete a user
    Delete {
        /// Username of the record to delete
        username: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Email a new password to an account
    ResetPassword {
        /// Email address of the account
        email: String,
    },
    /// Upload a profile image
    SetAvatar {
        /// Image file to upload
        image: PathBuf,

        /// Target username (defaults to the signed-in user)
        #[arg(short, long)]
        username: Option<String>,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Full name
    name: String,
    /// Username
    username: String,
    /// Email
    email: String,
    /// Role
    role: String,
    /// Status
    status: String,
    /// Last login
    last_login: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.clone(),
            name: user.full_name(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            status: status_label(user).to_string(),
            last_login: user
                .last_login_date_display
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Account status shown in the table.
fn status_label(user: &User) -> &'static str {
    if !user.active {
        "Inactive"
    } else if !user.not_locked {
        "Locked"
    } else {
        "Active"
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let context = ClientContext::new(config)?;
    super::ensure_logged_in(&context).await?;

    match &args.command {
        UserCommand::List { page, page_size } => {
            let users = context.directory.load_users().await?;
            if matches!(format, OutputFormat::Table) {
                output::print_success(&format!("{} user(s) loaded successfully.", users.len()));
            }
            let listing = context
                .directory
                .page(&PageRequest::new(*page, *page_size))
                .await?;
            let rows = PageResponse::new(
                listing.items.iter().map(UserRow::from).collect(),
                listing.page,
                listing.page_size,
                listing.total_items,
            );
            output::print_page(&rows, format);
        }
        UserCommand::Search { term } => {
            if context.directory.cached_users().await?.is_empty() {
                context.directory.load_users().await?;
            }
            let results = context.directory.search(term).await?;
            let rows: Vec<UserRow> = results.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::Add {
            first_name,
            last_name,
            username,
            email,
            role,
            inactive,
            locked,
            image,
        } => {
            let mut form = UserForm::new(
                super::prompt_if_missing(first_name.as_ref(), "First name")?,
                super::prompt_if_missing(last_name.as_ref(), "Last name")?,
                super::prompt_if_missing(username.as_ref(), "Username")?,
                super::prompt_if_missing(email.as_ref(), "Email")?,
            );
            form.role = *role;
            form.active = !*inactive;
            form.not_locked = !*locked;
            form.profile_image = image.clone();

            let user = context.directory.add_user(&form).await?;
            output::print_success(&format!(
                "{} {} added successfully",
                user.first_name, user.last_name
            ));
        }
        UserCommand::Update {
            username,
            first_name,
            last_name,
            new_username,
            email,
            role,
            active,
            locked,
            image,
        } => {
            let existing = find_user(&context, username).await?;
            let form = UserForm {
                first_name: first_name.clone().unwrap_or_else(|| existing.first_name.clone()),
                last_name: last_name.clone().unwrap_or_else(|| existing.last_name.clone()),
                username: new_username.clone().unwrap_or_else(|| existing.username.clone()),
                email: email.clone().unwrap_or_else(|| existing.email.clone()),
                role: (*role).unwrap_or(existing.role),
                active: (*active).unwrap_or(existing.active),
                not_locked: (*locked).map(|l| !l).unwrap_or(existing.not_locked),
                profile_image: image.clone(),
            };

            let user = context.directory.update_user(username, &form).await?;
            output::print_success(&format!(
                "{} {} updated successfully",
                user.first_name, user.last_name
            ));
        }
        UserCommand::UpdateProfile {
            first_name,
            last_name,
            username,
            email,
            image,
        } => {
            let current = context
                .manager
                .user()
                .await?
                .ok_or_else(|| AppError::session("No signed-in user in the session"))?;
            let form = UserForm {
                first_name: first_name.clone().unwrap_or_else(|| current.first_name.clone()),
                last_name: last_name.clone().unwrap_or_else(|| current.last_name.clone()),
                username: username.clone().unwrap_or_else(|| current.username.clone()),
                email: email.clone().unwrap_or_else(|| current.email.clone()),
                role: current.role,
                active: current.active,
                not_locked: current.not_locked,
                profile_image: image.clone(),
            };

            let user = context.directory.update_own_profile(&form).await?;
            output::print_success(&format!(
                "{} {} updated successfully",
                user.first_name, user.last_name
            ));
        }
        UserCommand::Delete { username, yes } => {
            if !*yes {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete user '{}'?", username))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
                if !confirmed {
                    output::print_warning("Delete cancelled.");
                    return Ok(());
                }
            }
            context.directory.delete_user(username).await?;
            output::print_success("User successfully deleted!");
        }
        UserCommand::ResetPassword { email } => {
            // The portal reports reset failures as warnings, not errors.
            match context.directory.reset_password(email).await {
                Ok(()) => {
                    output::print_success(&format!("Email successfully sent to {}", email));
                }
                Err(e) => output::print_warning(&e.message),
            }
        }
        UserCommand::SetAvatar { image, username } => {
            let target = match username {
                Some(u) => u.clone(),
                None => context
                    .manager
                    .user()
                    .await?
                    .map(|u| u.username)
                    .ok_or_else(|| AppError::session("No signed-in user in the session"))?,
            };

            let (tx, mut rx) = mpsc::unbounded_channel();
            let printer = tokio::spawn(async move {
                let mut drawn = false;
                while let Some(event) = rx.recv().await {
                    match event {
                        UploadEvent::Progress { percent } => {
                            output::print_progress("Uploading", percent);
                            drawn = true;
                        }
                        UploadEvent::Done => break,
                    }
                }
                if drawn {
                    output::finish_progress();
                }
            });

            let result = context.directory.upload_avatar(&target, image, tx).await;
            let _ = printer.await;
            let updated = result?;
            output::print_success(&format!(
                "{}'s profile image updated successfully",
                updated.first_name
            ));
        }
    }

    Ok(())
}

/// Look a user up by username, refreshing the cache once on a miss.
async fn find_user(context: &ClientContext, username: &str) -> Result<User, AppError> {
    let cached = context.directory.cached_users().await?;
    if let Some(user) = cached.into_iter().find(|user| user.username == username) {
        return Ok(user);
    }
    let fresh = context.directory.load_users().await?;
    fresh
        .into_iter()
        .find(|user| user.username == username)
        .ok_or_else(|| AppError::not_found(format!("User '{}' not found", username)))
}

//! Request DTOs with validation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

use staffhub_entity::user::UserRole;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request body.
///
/// The portal generates the password and emails it to the new account,
/// so none is sent here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// First name.
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    /// Last name.
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    /// Desired username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Email address the generated password is sent to.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

/// Fields for creating or updating a user via the multipart endpoints.
///
/// Booleans are transmitted as the literal strings `"true"`/`"false"`;
/// the role is transmitted as its `ROLE_*` wire string.
#[derive(Debug, Clone, Validate)]
pub struct UserForm {
    /// First name.
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    /// Last name.
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    /// Assigned role.
    pub role: UserRole,
    /// Whether the account is active.
    pub active: bool,
    /// Whether the account is not locked.
    pub not_locked: bool,
    /// Optional profile image to attach.
    pub profile_image: Option<PathBuf>,
}

impl UserForm {
    /// Creates a form with the portal's defaults: active, unlocked,
    /// baseline role, no image.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            username: username.into(),
            email: email.into(),
            role: UserRole::default(),
            active: true,
            not_locked: true,
            profile_image: None,
        }
    }
}

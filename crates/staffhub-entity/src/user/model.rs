//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::UserRole;

/// A registered user in the employee portal.
///
/// Field names follow the portal's JSON (camelCase, `active` and
/// `notLocked` without an `is` prefix).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Portal-generated public identifier (numeric string, not a DB key).
    #[serde(default)]
    pub user_id: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Unique login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// URL of the user's profile image, if one was assigned.
    #[serde(default)]
    pub profile_image_url: Option<String>,
    /// Last successful login time.
    #[serde(default)]
    pub last_login_date: Option<DateTime<Utc>>,
    /// Login time shown in the UI (previous successful login).
    #[serde(default)]
    pub last_login_date_display: Option<DateTime<Utc>>,
    /// When the account was created.
    #[serde(default)]
    pub join_date: Option<DateTime<Utc>>,
    /// User role (RBAC).
    #[serde(default)]
    pub role: UserRole,
    /// Fine-grained authorities granted by the role.
    #[serde(default)]
    pub authorities: Vec<String>,
    /// Whether the account is active.
    #[serde(default)]
    pub active: bool,
    /// Whether the account is not locked.
    #[serde(default)]
    pub not_locked: bool,
}

impl User {
    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if this user is an admin or a manager.
    pub fn is_admin_or_manager(&self) -> bool {
        self.role.is_admin_or_manager()
    }

    /// Check whether this user matches a search term.
    ///
    /// Matching is a case-insensitive substring test over first name,
    /// last name, username, and user ID.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.first_name.to_lowercase().contains(&needle)
            || self.last_name.to_lowercase().contains(&needle)
            || self.username.to_lowercase().contains(&needle)
            || self.user_id.to_lowercase().contains(&needle)
    }
}

//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the portal's RBAC system.
///
/// Roles are ordered by privilege level:
/// SuperAdmin > Admin > Manager > Hr > User.
///
/// The portal transmits roles with a `ROLE_` prefix; the bare names are
/// accepted on input for convenience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Baseline employee account, read-only directory access.
    #[serde(rename = "ROLE_USER", alias = "USER")]
    User,
    /// Human resources staff, can update user records.
    #[serde(rename = "ROLE_HR", alias = "HR")]
    Hr,
    /// Team manager, can update user records.
    #[serde(rename = "ROLE_MANAGER", alias = "MANAGER")]
    Manager,
    /// Administrator, can create and update users.
    #[serde(rename = "ROLE_ADMIN", alias = "ADMIN")]
    Admin,
    /// Super administrator, full control including deletion.
    #[serde(rename = "ROLE_SUPER_ADMIN", alias = "SUPER_ADMIN")]
    SuperAdmin,
}

impl UserRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::SuperAdmin => 5,
            Self::Admin => 4,
            Self::Manager => 3,
            Self::Hr => 2,
            Self::User => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &UserRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role carries admin privileges.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// Check if this role is an admin or a manager.
    pub fn is_admin_or_manager(&self) -> bool {
        self.is_admin() || matches!(self, Self::Manager)
    }

    /// Authorities granted to this role by the portal.
    pub fn authorities(&self) -> &'static [&'static str] {
        match self {
            Self::User => &["user:read"],
            Self::Hr | Self::Manager => &["user:read", "user:update"],
            Self::Admin => &["user:read", "user:update", "user:create"],
            Self::SuperAdmin => &["user:read", "user:update", "user:create", "user:delete"],
        }
    }

    /// Return the role as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
            Self::Hr => "ROLE_HR",
            Self::Manager => "ROLE_MANAGER",
            Self::Admin => "ROLE_ADMIN",
            Self::SuperAdmin => "ROLE_SUPER_ADMIN",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = staffhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_uppercase();
        match normalized.trim_start_matches("ROLE_") {
            "USER" => Ok(Self::User),
            "HR" => Ok(Self::Hr),
            "MANAGER" => Ok(Self::Manager),
            "ADMIN" => Ok(Self::Admin),
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            _ => Err(staffhub_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: user, hr, manager, admin, super_admin"
            ))),
        }
    }
}

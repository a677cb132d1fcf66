//! Login guard for authenticated views.

use tracing::debug;

use staffhub_core::result::AppResult;

use crate::manager::SessionManager;

/// Notification shown when an unauthenticated user hits a guarded view.
pub const LOGIN_REQUIRED_MESSAGE: &str = "You need to login to access this page.";

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The view may be shown.
    Allow,
    /// The caller must be sent to the login view, with a notification.
    Deny {
        /// Message to surface to the user.
        message: String,
    },
}

impl AccessDecision {
    /// Returns whether access was granted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Guards authenticated views behind the login check.
///
/// Every guarded view performs a fresh check, so an expired or removed
/// token denies the very next navigation.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    /// Session manager consulted for the login state.
    manager: SessionManager,
}

impl AccessGuard {
    /// Creates a guard over the given session manager.
    pub fn new(manager: SessionManager) -> Self {
        Self { manager }
    }

    /// Decides whether a guarded view may be shown right now.
    pub async fn check(&self) -> AppResult<AccessDecision> {
        if self.manager.is_logged_in().await? {
            return Ok(AccessDecision::Allow);
        }
        debug!("Access denied, no active login session");
        Ok(AccessDecision::Deny {
            message: LOGIN_REQUIRED_MESSAGE.to_string(),
        })
    }
}

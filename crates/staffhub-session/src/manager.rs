//! Session lifecycle management.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use staffhub_core::result::AppResult;
use staffhub_entity::user::User;

use crate::claims::Claims;
use crate::store::SessionStore;

/// Manages the local login session.
///
/// Wraps the [`SessionStore`] with the login truth table: a user counts
/// as logged in only when a token is present, its payload decodes, the
/// subject is non-empty, and the token has not expired. The username
/// from the last successful check is cached for display and for profile
/// updates.
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// Underlying session document store.
    store: SessionStore,
    /// Username from the last successful login check.
    logged_in_username: Arc<RwLock<Option<String>>>,
}

impl SessionManager {
    /// Creates a session manager over the given store.
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            logged_in_username: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the underlying session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Saves the bearer token received from the portal.
    pub async fn save_token(&self, token: &str) -> AppResult<()> {
        self.store.save_token(token).await
    }

    /// Returns the stored bearer token.
    pub async fn token(&self) -> AppResult<Option<String>> {
        self.store.token().await
    }

    /// Saves the signed-in user's profile.
    pub async fn save_user(&self, user: &User) -> AppResult<()> {
        self.store.save_user(user).await
    }

    /// Returns the cached signed-in user.
    pub async fn user(&self) -> AppResult<Option<User>> {
        self.store.user().await
    }

    /// Saves the cached user directory.
    pub async fn save_users(&self, users: &[User]) -> AppResult<()> {
        self.store.save_users(users).await
    }

    /// Returns the cached user directory.
    pub async fn users(&self) -> AppResult<Option<Vec<User>>> {
        self.store.users().await
    }

    /// Ends the session, dropping the token and all cached records.
    pub async fn log_out(&self) -> AppResult<()> {
        *self.logged_in_username.write().await = None;
        self.store.clear().await?;
        debug!("Session cleared");
        Ok(())
    }

    /// Checks whether a user is currently logged in.
    ///
    /// A missing or empty token clears the session outright. A token
    /// that fails to decode, lacks a subject, or has expired reports
    /// not-logged-in but leaves the stored state untouched so it can be
    /// inspected.
    pub async fn is_logged_in(&self) -> AppResult<bool> {
        let token = self.store.token().await?;
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => {
                self.log_out().await?;
                return Ok(false);
            }
        };

        let Ok(claims) = Claims::peek(&token) else {
            debug!("Stored token does not decode");
            return Ok(false);
        };
        if !claims.has_subject() {
            debug!("Stored token has no subject");
            return Ok(false);
        }
        if claims.is_expired() {
            debug!(username = %claims.sub, "Stored token has expired");
            return Ok(false);
        }

        *self.logged_in_username.write().await = Some(claims.sub.clone());
        Ok(true)
    }

    /// Returns the username cached by the last successful login check.
    pub async fn logged_in_username(&self) -> Option<String> {
        self.logged_in_username.read().await.clone()
    }

    /// Peeks the claims of the stored token, if any.
    pub async fn claims(&self) -> AppResult<Option<Claims>> {
        match self.store.token().await? {
            Some(token) if !token.is_empty() => Ok(Claims::peek(&token).ok()),
            _ => Ok(None),
        }
    }
}

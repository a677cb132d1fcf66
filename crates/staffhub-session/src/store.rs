//! Typed session store over a state backend.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use staffhub_core::result::AppResult;
use staffhub_core::traits::state::StateBackend;
use staffhub_entity::user::User;

/// The persisted session document.
///
/// All entries live in one document so that clearing the session drops
/// the token, the cached profile, and the cached directory in a single
/// backend operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionState {
    /// Bearer token issued at login.
    #[serde(default)]
    token: Option<String>,
    /// Profile of the signed-in user.
    #[serde(default)]
    user: Option<User>,
    /// Cached copy of the user directory.
    #[serde(default)]
    users: Option<Vec<User>>,
}

/// Read/write access to the local session document.
///
/// Every accessor performs a full read-modify-write against the backend,
/// so concurrent invocations see last-writer-wins semantics rather than
/// partial updates.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// The persistence backend.
    backend: Arc<dyn StateBackend>,
}

impl SessionStore {
    /// Creates a session store over the given backend.
    pub fn new(backend: Arc<dyn StateBackend>) -> Self {
        Self { backend }
    }

    /// Returns the stored bearer token.
    pub async fn token(&self) -> AppResult<Option<String>> {
        Ok(self.read_state().await?.token)
    }

    /// Saves the bearer token.
    pub async fn save_token(&self, token: &str) -> AppResult<()> {
        self.update(|state| state.token = Some(token.to_string()))
            .await
    }

    /// Returns the cached signed-in user.
    pub async fn user(&self) -> AppResult<Option<User>> {
        Ok(self.read_state().await?.user)
    }

    /// Saves the signed-in user's profile.
    pub async fn save_user(&self, user: &User) -> AppResult<()> {
        let user = user.clone();
        self.update(|state| state.user = Some(user)).await
    }

    /// Returns the cached user directory.
    pub async fn users(&self) -> AppResult<Option<Vec<User>>> {
        Ok(self.read_state().await?.users)
    }

    /// Saves the user directory cache.
    pub async fn save_users(&self, users: &[User]) -> AppResult<()> {
        let users = users.to_vec();
        self.update(|state| state.users = Some(users)).await
    }

    /// Clears the whole session document in one backend operation.
    pub async fn clear(&self) -> AppResult<()> {
        self.backend.clear().await
    }

    /// Loads and parses the current state document.
    ///
    /// A corrupt document is treated as an empty session rather than a
    /// hard failure, matching how a browser recovers from bad storage.
    async fn read_state(&self) -> AppResult<SessionState> {
        match self.backend.load().await? {
            Some(document) => match serde_json::from_str(&document) {
                Ok(state) => Ok(state),
                Err(e) => {
                    warn!(error = %e, "Session state is corrupt, starting empty");
                    Ok(SessionState::default())
                }
            },
            None => Ok(SessionState::default()),
        }
    }

    /// Applies a mutation to the state document and persists it.
    async fn update(&self, mutate: impl FnOnce(&mut SessionState)) -> AppResult<()> {
        let mut state = self.read_state().await?;
        mutate(&mut state);
        let document = serde_json::to_string(&state)?;
        self.backend.store(&document).await
    }
}

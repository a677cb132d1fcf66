//! Login and registration against the portal.

use reqwest::Method;
use tracing::info;
use validator::Validate;

use staffhub_core::error::{AppError, ErrorKind};
use staffhub_core::result::AppResult;
use staffhub_entity::user::User;
use staffhub_session::SessionManager;

use crate::api::ApiClient;
use crate::dto::{LoginRequest, RegisterRequest};
use crate::routes;

/// Response header carrying the bearer token after login.
pub const TOKEN_HEADER: &str = "Jwt-Token";

/// The network half of authentication: exchanging credentials for a
/// session.
///
/// Local session questions (is anyone logged in, who) live on
/// [`SessionManager`]; this type only talks to the portal and feeds the
/// results into the session.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    /// Portal HTTP access.
    api: ApiClient,
    /// Session the login results are written to.
    manager: SessionManager,
}

impl AuthFlow {
    /// Creates an auth flow writing into the given session.
    pub fn new(api: ApiClient, manager: SessionManager) -> Self {
        Self { api, manager }
    }

    /// Logs in and persists the session.
    ///
    /// The portal returns the signed token in the `Jwt-Token` response
    /// header and the user record in the body; both are saved before
    /// returning. Credentials are never validated locally beyond being
    /// non-empty.
    pub async fn login(&self, request: &LoginRequest) -> AppResult<User> {
        request
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let response = self
            .api
            .execute_json(Method::POST, routes::LOGIN, request)
            .await?;

        let token = response
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::authentication("Login response did not carry a session token")
            })?;

        let user: User = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Invalid login response body", e)
        })?;

        self.manager.save_token(&token).await?;
        self.manager.save_user(&user).await?;
        info!(username = %user.username, "Logged in");
        Ok(user)
    }

    /// Registers a new account.
    ///
    /// The portal emails the generated password; registration does not
    /// log the new account in.
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        request
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let response = self
            .api
            .execute_json(Method::POST, routes::REGISTER, request)
            .await?;

        let user: User = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                "Invalid registration response body",
                e,
            )
        })?;
        info!(username = %user.username, "Registered new account");
        Ok(user)
    }
}

//! Authorized HTTP access to the portal.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use tracing::debug;

use staffhub_core::config::api::ApiConfig;
use staffhub_core::error::{AppError, ErrorKind};
use staffhub_core::result::AppResult;
use staffhub_session::SessionStore;

use crate::dto::ErrorPayload;
use crate::routes;

/// Message surfaced when the portal's error body carries no message.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// HTTP client that authorizes requests against the portal.
///
/// Builders are constructed fresh per call and the bearer token is
/// re-read from the session store each time, so a login or logout in
/// between calls takes effect immediately. Login and register requests
/// are sent without an `Authorization` header.
#[derive(Clone)]
pub struct ApiClient {
    /// Underlying HTTP client.
    http: reqwest::Client,
    /// Portal base URL without a trailing slash.
    base_url: String,
    /// Session store consulted for the bearer token.
    store: SessionStore,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    /// Creates a client from configuration.
    pub fn new(config: &ApiConfig, store: SessionStore) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Network, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            http,
            base_url: config.normalized_base_url().to_string(),
            store,
        })
    }

    /// Creates a client against an explicit base URL (for testing).
    pub fn with_base_url(base_url: impl Into<String>, store: SessionStore) -> AppResult<Self> {
        let config = ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::new(&config, store)
    }

    /// Returns the portal base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the session store this client authorizes from.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Absolute URL for a portal path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Prepares a request for the given path, attaching the bearer token
    /// unless the path is public.
    pub async fn request(&self, method: Method, path: &str) -> AppResult<RequestBuilder> {
        let builder = self.http.request(method, self.url(path));
        if routes::is_public(path) {
            return Ok(builder);
        }
        match self.store.token().await? {
            Some(token) if !token.is_empty() => Ok(builder.bearer_auth(token)),
            _ => Ok(builder),
        }
    }

    /// Sends a prepared request and maps failures to [`AppError`].
    ///
    /// Transport failures become `Network` errors; non-success statuses
    /// are decoded into the portal's error payload.
    pub async fn execute(&self, builder: RequestBuilder) -> AppResult<Response> {
        let response = builder.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::Network, format!("Request failed: {e}"), e)
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        debug!(status = %status, "Portal returned an error status");
        Err(error_from_response(response).await)
    }

    /// Convenience for request-then-execute with a JSON body.
    pub async fn execute_json<B: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> AppResult<Response> {
        let builder = self.request(method, path).await?;
        self.execute(builder.json(body)).await
    }
}

/// Decodes a non-success response into an [`AppError`].
///
/// The user-facing message is the portal's `message` field when present,
/// otherwise [`GENERIC_ERROR_MESSAGE`].
pub(crate) async fn error_from_response(response: Response) -> AppError {
    let status = response.status();
    let payload = response.json::<ErrorPayload>().await.unwrap_or_default();
    let message = payload
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
    AppError::new(kind_for_status(status), message)
}

/// Maps an HTTP status to the application error kind.
fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::BAD_REQUEST => ErrorKind::Validation,
        StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
        StatusCode::FORBIDDEN => ErrorKind::Authorization,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        _ => ErrorKind::Api,
    }
}

//! Shared wiring for CLI commands.

use tracing::debug;

use staffhub_client::{ApiClient, AuthFlow, UserDirectory};
use staffhub_core::config::AppConfig;
use staffhub_core::result::AppResult;
use staffhub_session::{AccessGuard, SessionManager, SessionStore, backend};

/// Everything a command needs to talk to the portal.
///
/// Built once per invocation: the configured session backend, the store
/// and manager over it, and the API client that authorizes requests from
/// the same store.
#[derive(Debug, Clone)]
pub struct ClientContext {
    /// Loaded configuration.
    pub config: AppConfig,
    /// Session manager over the configured backend.
    pub manager: SessionManager,
    /// Login guard for authenticated commands.
    pub guard: AccessGuard,
    /// Login and registration flow.
    pub auth: AuthFlow,
    /// Client-side view of the user directory.
    pub directory: UserDirectory,
}

impl ClientContext {
    /// Wire up a context from configuration.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let backend = backend::from_config(&config.session)?;
        let store = SessionStore::new(backend);
        let manager = SessionManager::new(store.clone());
        let api = ApiClient::new(&config.api, store)?;
        debug!(base_url = %api.base_url(), "Portal client ready");
        let auth = AuthFlow::new(api.clone(), manager.clone());
        let directory = UserDirectory::new(api, manager.clone());
        let guard = AccessGuard::new(manager.clone());
        Ok(Self {
            config,
            manager,
            guard,
            auth,
            directory,
        })
    }
}

//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod api;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};
use tracing::debug;

use self::api::ApiConfig;
use self::logging::LoggingConfig;
use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (user config + working-directory overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Portal API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Local session state settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// With an explicit `config_file` only that file is read, and it must
    /// exist. Otherwise the user configuration file
    /// (`~/.config/staffhub/config.toml`) is merged with a
    /// working-directory overlay (`staffhub.toml`). Environment variables
    /// prefixed with `STAFFHUB` override both.
    pub fn load(config_file: Option<&std::path::Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();

        match config_file {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                builder = builder.add_source(config::File::from(path));
            }
            None => {
                if let Some(user_config) = Self::user_config_path() {
                    builder = builder
                        .add_source(config::File::from(user_config.as_path()).required(false));
                }
                builder =
                    builder.add_source(config::File::with_name("staffhub").required(false));
            }
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("STAFFHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Path of the per-user configuration file, if a config directory exists.
    fn user_config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("staffhub").join("config.toml"))
    }
}

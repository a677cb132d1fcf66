//! Session state backends.

pub mod file;
pub mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::sync::Arc;

use tracing::info;

use staffhub_core::config::session::SessionConfig;
use staffhub_core::error::AppError;
use staffhub_core::result::AppResult;
use staffhub_core::traits::state::StateBackend;

/// Creates the state backend selected by configuration.
pub fn from_config(config: &SessionConfig) -> AppResult<Arc<dyn StateBackend>> {
    match config.backend.as_str() {
        "file" => {
            let path = config.state_file();
            info!(path = %path.display(), "Initializing file session backend");
            Ok(Arc::new(FileBackend::new(path)))
        }
        "memory" => {
            info!("Initializing in-memory session backend");
            Ok(Arc::new(MemoryBackend::new()))
        }
        other => Err(AppError::configuration(format!(
            "Unknown session backend: '{other}'. Supported: file, memory"
        ))),
    }
}

//! File-based session state backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use staffhub_core::error::{AppError, ErrorKind};
use staffhub_core::result::AppResult;
use staffhub_core::traits::state::StateBackend;

/// Persists the session state document as a JSON file.
///
/// Writes go through a sibling temp file followed by a rename, so a
/// crash mid-write never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct FileBackend {
    /// Path of the state document.
    path: PathBuf,
}

impl FileBackend {
    /// Creates a file backend storing state at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensures the parent directory of the state file exists.
    async fn ensure_parent(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create state directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Path of the temp file used for atomic replacement.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateBackend for FileBackend {
    async fn load(&self) -> AppResult<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read session state: {}", self.path.display()),
                e,
            )),
        }
    }

    async fn store(&self, document: &str) -> AppResult<()> {
        self.ensure_parent().await?;
        let temp = self.temp_path();
        fs::write(&temp, document).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write session state: {}", temp.display()),
                e,
            )
        })?;
        fs::rename(&temp, &self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace session state: {}", self.path.display()),
                e,
            )
        })?;
        debug!(path = %self.path.display(), bytes = document.len(), "Stored session state");
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Cleared session state");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to clear session state: {}", self.path.display()),
                e,
            )),
        }
    }
}

impl FileBackend {
    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

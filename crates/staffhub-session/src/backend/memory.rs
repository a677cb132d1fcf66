//! In-memory session state backend.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use staffhub_core::result::AppResult;
use staffhub_core::traits::state::StateBackend;

/// Keeps the session state document in process memory.
///
/// Used by tests and by one-shot invocations that must not touch the
/// user's on-disk session.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    /// The current state document.
    document: Arc<RwLock<Option<String>>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateBackend for MemoryBackend {
    async fn load(&self) -> AppResult<Option<String>> {
        Ok(self.document.read().await.clone())
    }

    async fn store(&self, document: &str) -> AppResult<()> {
        *self.document.write().await = Some(document.to_string());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.document.write().await = None;
        Ok(())
    }
}

//! State backend trait for pluggable session persistence.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for session state backends (file-based or in-memory).
///
/// A backend persists a single serialized state document. The session
/// store owns the typed view of the document and delegates durability
/// to the backend, so replacing or clearing the document is atomic from
/// the caller's perspective.
#[async_trait]
pub trait StateBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Load the serialized state document.
    ///
    /// Returns `None` when no state has been stored yet.
    async fn load(&self) -> AppResult<Option<String>>;

    /// Store the serialized state document, replacing any previous one.
    async fn store(&self, document: &str) -> AppResult<()>;

    /// Remove the state document entirely.
    async fn clear(&self) -> AppResult<()>;
}

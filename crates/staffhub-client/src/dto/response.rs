//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Error payload the portal returns for failed requests.
///
/// Every field is optional: proxies and hard crashes can produce bodies
/// that carry only part of the shape, or none of it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    /// Numeric HTTP status code.
    #[serde(default)]
    pub http_status_code: Option<u16>,
    /// HTTP status name, e.g. `"BAD_REQUEST"`.
    #[serde(default)]
    pub http_status: Option<String>,
    /// Short reason phrase.
    #[serde(default)]
    pub reason: Option<String>,
    /// Human-readable message to surface to the user.
    #[serde(default)]
    pub message: Option<String>,
}

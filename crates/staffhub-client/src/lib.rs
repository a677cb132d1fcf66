//! # staffhub-client
//!
//! HTTP client for the StaffHub employee portal API: request
//! authorization, the login/register flow, and the user directory with
//! its local cache, search, and avatar upload.

pub mod api;
pub mod auth;
pub mod directory;
pub mod dto;
pub mod routes;
pub mod upload;

pub use api::ApiClient;
pub use auth::AuthFlow;
pub use directory::UserDirectory;
pub use upload::UploadEvent;

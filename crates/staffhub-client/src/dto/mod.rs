//! Request and response payloads exchanged with the portal.

pub mod request;
pub mod response;

pub use request::{LoginRequest, RegisterRequest, UserForm};
pub use response::ErrorPayload;

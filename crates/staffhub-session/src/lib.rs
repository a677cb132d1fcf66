//! # staffhub-session
//!
//! Local session state for the StaffHub client: bearer token persistence,
//! unverified token claim peeks, and the login guard that protects
//! authenticated views.
//!
//! The client never holds the portal's signing secret, so claims are
//! decoded without signature verification and are advisory only. The
//! portal remains the authority on every request.

pub mod backend;
pub mod claims;
pub mod guard;
pub mod manager;
pub mod store;

pub use claims::Claims;
pub use guard::{AccessDecision, AccessGuard};
pub use manager::SessionManager;
pub use store::SessionStore;

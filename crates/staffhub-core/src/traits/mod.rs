//! Core traits defined in `staffhub-core` and implemented by other crates.

pub mod state;

pub use state::StateBackend;

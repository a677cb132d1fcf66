//! # staffhub-cli
//!
//! Command definitions and terminal output for the `staffhub` binary.
//! Commands wire configuration, the local session, and the portal client
//! together via [`context::ClientContext`] and render results as tables,
//! JSON, or notification-style messages.

pub mod commands;
pub mod context;
pub mod output;

pub use commands::Cli;

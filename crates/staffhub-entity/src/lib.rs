//! # staffhub-entity
//!
//! Domain entity models for StaffHub. Every struct in this crate mirrors
//! a record exchanged with the employee portal API. All entities derive
//! `Debug`, `Clone`, `Serialize`, and `Deserialize`, and serialize with
//! the portal's camelCase field names.

pub mod user;

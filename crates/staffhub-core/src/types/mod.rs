//! Core type definitions used across the StaffHub workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};

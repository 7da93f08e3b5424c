//! Port contracts for project and task tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;

pub use repository::{TaskStore, TaskStoreError, TaskStoreResult, TaskStoreTransaction};

//! Adapter implementations of the task tracking ports.
//!
//! - [`memory`]: lock-guarded in-memory store for tests and tooling
//! - [`postgres`]: Diesel-backed `PostgreSQL` store

pub mod memory;
pub mod postgres;

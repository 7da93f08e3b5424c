//! Project and task tracking.
//!
//! Managers own projects, projects own tasks, and tasks may be assigned to
//! a user who reports progress through a narrow status-only path. Each
//! action resolves its entities, consults the access policy, and commits
//! inside a single store transaction. The module follows hexagonal
//! architecture:
//!
//! - Domain types and pure policy in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

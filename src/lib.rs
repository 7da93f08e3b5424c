//! Task tracker: role-gated project and task management.
//!
//! This crate provides the core of a tracker in which managers own
//! projects, create tasks inside them, and assign those tasks to users.
//!
//! # Architecture
//!
//! The tracker follows hexagonal architecture principles:
//!
//! - **Domain**: Entities, access policy, and query descriptions with no
//!   infrastructure dependencies
//! - **Ports**: The transactional entity store contract
//! - **Adapters**: In-memory and `PostgreSQL` store implementations
//! - **Services**: Task lifecycle, project, and user directory orchestration
//!
//! # Modules
//!
//! - [`config`]: Entity store connection settings
//! - [`task`]: Projects, tasks, users, and their lifecycle

pub mod config;
pub mod task;

//! Shared failure vocabulary for application services.

use crate::task::domain::{ProjectId, TaskId, UserId};
use std::fmt;

/// Identity of an entity that could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// A task identity.
    Task(TaskId),
    /// A project identity.
    Project(ProjectId),
    /// A user identity.
    User(UserId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(id) => write!(f, "Task with id {}", id.value()),
            Self::Project(id) => write!(f, "Project with id {}", id.value()),
            Self::User(id) => write!(f, "User with id {}", id.value()),
        }
    }
}

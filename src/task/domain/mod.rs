//! Domain model for project and task tracking.
//!
//! Users own projects, projects own tasks, and tasks may be assigned to a
//! user. The [`access`] module decides who may mutate what and the [`query`]
//! module describes filtered task retrieval. Infrastructure concerns stay
//! outside the domain boundary.

pub mod access;
mod error;
mod ids;
mod project;
pub mod query;
mod task;
mod user;

pub use access::{AccessDecision, DenialReason, DetailChange};
pub use error::{ParseDomainValueError, TaskDomainError};
pub use ids::{Email, ProjectId, ProjectName, TaskId, TaskTitle, UserId};
pub use project::{
    MAX_PROJECT_DESCRIPTION_CHARS, NewProject, PersistedProjectData, Project, ProjectDetails,
};
pub use query::{
    DEFAULT_PAGE_SIZE, Page, PageRequest, SortDirection, TaskFilter, TaskQuery, TaskSort,
    TaskSortField,
};
pub use task::{NewTask, PersistedTaskData, Task, TaskDetailsChange, TaskPriority, TaskStatus};
pub use user::{Actor, NewUser, Role, User};

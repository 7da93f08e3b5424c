//! Entity store port: transactional access to users, projects, and tasks.

use crate::task::domain::{
    Email, NewProject, NewTask, NewUser, Page, Project, ProjectId, Task, TaskId, TaskQuery, User,
    UserId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for entity store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Durable storage for users, projects, and tasks.
///
/// All reads and writes happen inside [`TaskStore::transact`], which runs a
/// synchronous unit of work against a [`TaskStoreTransaction`]. The unit
/// commits when the closure returns `Ok` and rolls back every write
/// otherwise, so no other unit observes an intermediate state.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Runs `work` as one atomic unit.
    ///
    /// # Errors
    ///
    /// Returns the closure's error after rolling back, or a
    /// [`TaskStoreError`] converted into `E` when the store itself fails.
    async fn transact<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TaskStoreTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TaskStoreError> + Send + 'static;
}

/// Operations available inside a unit of work.
///
/// Lookups return `None` for unknown identities. Writes to unknown
/// identities fail with [`TaskStoreError::MissingRow`].
pub trait TaskStoreTransaction {
    /// Finds a user by identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] on storage failure.
    fn find_user(&mut self, id: UserId) -> TaskStoreResult<Option<User>>;

    /// Finds a user by email address.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] on storage failure.
    fn find_user_by_email(&mut self, email: &Email) -> TaskStoreResult<Option<User>>;

    /// Stores a new user and returns it with its assigned identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateEmail`] when the address is taken.
    fn insert_user(&mut self, user: NewUser) -> TaskStoreResult<User>;

    /// Finds a project by identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] on storage failure.
    fn find_project(&mut self, id: ProjectId) -> TaskStoreResult<Option<Project>>;

    /// Returns every project in identity order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] on storage failure.
    fn list_projects(&mut self) -> TaskStoreResult<Vec<Project>>;

    /// Stores a new project and returns it with its assigned identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::MissingReference`] when the owner does not
    /// exist.
    fn insert_project(&mut self, project: NewProject) -> TaskStoreResult<Project>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::MissingRow`] when the project does not exist.
    fn save_project(&mut self, project: &Project) -> TaskStoreResult<()>;

    /// Deletes a project together with its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::MissingRow`] when the project does not exist.
    fn delete_project(&mut self, id: ProjectId) -> TaskStoreResult<()>;

    /// Finds a task by identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] on storage failure.
    fn find_task(&mut self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Returns the requested page of tasks matching every query filter, and
    /// the size of the full matching set.
    ///
    /// A page past the last one is empty but carries the correct total.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] on storage failure.
    fn find_tasks(&mut self, query: &TaskQuery) -> TaskStoreResult<Page<Task>>;

    /// Stores a new task and returns it with its assigned identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::MissingReference`] when the project or the
    /// assignee does not exist.
    fn insert_task(&mut self, task: NewTask) -> TaskStoreResult<Task>;

    /// Persists changes to an existing task. The last save wins.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::MissingRow`] when the task does not exist,
    /// or [`TaskStoreError::MissingReference`] for an unknown assignee.
    fn save_task(&mut self, task: &Task) -> TaskStoreResult<()>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::MissingRow`] when the task does not exist.
    fn delete_task(&mut self, id: TaskId) -> TaskStoreResult<()>;
}

/// Errors returned by entity store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// Another user already has the email address.
    #[error("duplicate email address: {0}")]
    DuplicateEmail(Email),

    /// A write targeted a row that does not exist.
    #[error("no stored row for {0}")]
    MissingRow(String),

    /// A write referenced a user or project that does not exist.
    #[error("referenced {0} does not exist")]
    MissingReference(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Reports a write to an unknown identity.
    pub fn missing_row(identity: impl std::fmt::Display) -> Self {
        Self::MissingRow(identity.to_string())
    }

    /// Reports a reference to an unknown identity.
    pub fn missing_reference(identity: impl std::fmt::Display) -> Self {
        Self::MissingReference(identity.to_string())
    }
}

//! Service layer for task creation, retrieval, and mutation.
//!
//! Every action runs as one unit of work: entities are resolved, the access
//! policy is consulted, and writes are committed together or not at all.

use super::error::EntityRef;
use crate::task::{
    domain::{
        Actor, DenialReason, DetailChange, NewTask, Page, PageRequest, Project, ProjectId, Task,
        TaskDetailsChange, TaskDomainError, TaskId, TaskPriority, TaskQuery, TaskStatus,
        TaskTitle, UserId, access,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreTransaction},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating a task inside a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    assignee_id: Option<UserId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        status: TaskStatus,
        priority: TaskPriority,
    ) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
            status,
            priority,
            due_date: None,
            assignee_id: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Assigns the task to a user on creation.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }
}

/// Partial update applied by the project owner.
///
/// Unset fields keep their stored value, except the assignee: leaving it
/// unset clears the current assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    due_date: Option<NaiveDate>,
    assignee_id: Option<UserId>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Assigns the task to the given user.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    fn into_change(self) -> Result<TaskDetailsChange, TaskDomainError> {
        Ok(TaskDetailsChange {
            title: self.title.map(TaskTitle::new).transpose()?,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            assignee_id: self.assignee_id,
        })
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// A referenced task, project, or user does not exist.
    #[error("{0} not found")]
    NotFound(EntityRef),
    /// The actor may not perform the action.
    #[error(transparent)]
    AccessDenied(#[from] DenialReason),
    /// Request input failed domain validation.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),
    /// Entity store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync + 'static,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a task in a project owned by the actor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown project or
    /// assignee, [`TaskLifecycleError::AccessDenied`] when the actor does not
    /// own the project, and [`TaskLifecycleError::Validation`] for an empty
    /// title.
    pub async fn create_task(
        &self,
        actor: Actor,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let project_id = request.project_id;
        let clock = Arc::clone(&self.clock);

        let result = self
            .store
            .transact(move |tx| -> TaskLifecycleResult<Task> {
                let project = require_project(tx, project_id)?;
                access::can_create_task(actor, &project).into_result()?;
                if let Some(assignee_id) = request.assignee_id {
                    require_user(tx, assignee_id)?;
                }
                let task = tx.insert_task(NewTask {
                    title,
                    description: request.description,
                    status: request.status,
                    priority: request.priority,
                    due_date: request.due_date,
                    project_id: project.id(),
                    assignee_id: request.assignee_id,
                    created_at: clock.utc(),
                })?;
                Ok(task)
            })
            .await;

        match &result {
            Ok(task) => info!(
                task_id = %task.id(),
                project_id = %task.project_id(),
                actor_id = %actor.id(),
                "created task"
            ),
            Err(err) => log_denial(actor, "create task", err),
        }
        result
    }

    /// Retrieves a task by identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn get_task(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.store
            .transact(move |tx| require_task(tx, id))
            .await
    }

    /// Lists a project's tasks matching the optional filters.
    ///
    /// An unknown project yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the store fails.
    pub async fn list_tasks(
        &self,
        project_id: ProjectId,
        status: Option<TaskStatus>,
        priority: Option<TaskPriority>,
        page: PageRequest,
    ) -> TaskLifecycleResult<Page<Task>> {
        let query = TaskQuery::for_project(project_id)
            .with_status(status)
            .with_priority(priority)
            .with_page(page);
        self.query_tasks(query).await
    }

    /// Runs a prepared task query, including any explicit sort.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the store fails.
    pub async fn query_tasks(&self, query: TaskQuery) -> TaskLifecycleResult<Page<Task>> {
        debug!(filters = ?query.filters(), sort = ?query.sort(), "querying tasks");
        let page = self
            .store
            .transact(move |tx| -> TaskLifecycleResult<Page<Task>> {
                Ok(tx.find_tasks(&query)?)
            })
            .await?;
        debug!(
            total = page.total(),
            returned = page.items().len(),
            "task query complete"
        );
        Ok(page)
    }

    /// Applies an owner-driven partial update to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task or
    /// assignee, [`TaskLifecycleError::AccessDenied`] when the actor does not
    /// own the task's project, and [`TaskLifecycleError::Validation`] for an
    /// empty title.
    pub async fn update_task_details(
        &self,
        actor: Actor,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let change = request.into_change()?;
        let clock = Arc::clone(&self.clock);

        let result = self
            .store
            .transact(move |tx| -> TaskLifecycleResult<Task> {
                let mut task = require_task(tx, id)?;
                let project = owning_project(tx, &task)?;
                access::can_modify_task_details(actor, &task, &project, DetailChange::Update)
                    .into_result()?;
                if let Some(assignee_id) = change.assignee_id {
                    require_user(tx, assignee_id)?;
                }
                task.apply_details(change, &*clock);
                tx.save_task(&task)?;
                Ok(task)
            })
            .await;

        match &result {
            Ok(task) => info!(
                task_id = %task.id(),
                actor_id = %actor.id(),
                assigned = task.assignee_id().is_some(),
                "updated task details"
            ),
            Err(err) => log_denial(actor, "update task details", err),
        }
        result
    }

    /// Sets a task's status on behalf of its assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task and
    /// [`TaskLifecycleError::AccessDenied`] when the actor is not the
    /// assignee.
    pub async fn update_task_status_only(
        &self,
        actor: Actor,
        id: TaskId,
        status: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        let clock = Arc::clone(&self.clock);

        let result = self
            .store
            .transact(move |tx| -> TaskLifecycleResult<Task> {
                let mut task = require_task(tx, id)?;
                access::can_modify_task_status_only(actor, &task).into_result()?;
                task.set_status(status, &*clock);
                tx.save_task(&task)?;
                Ok(task)
            })
            .await;

        match &result {
            Ok(task) => info!(
                task_id = %task.id(),
                actor_id = %actor.id(),
                status = task.status().as_str(),
                "updated task status"
            ),
            Err(err) => log_denial(actor, "update task status", err),
        }
        result
    }

    /// Deletes a task from a project owned by the actor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task and
    /// [`TaskLifecycleError::AccessDenied`] when the actor does not own the
    /// task's project.
    pub async fn delete_task(&self, actor: Actor, id: TaskId) -> TaskLifecycleResult<()> {
        let result = self
            .store
            .transact(move |tx| -> TaskLifecycleResult<()> {
                let task = require_task(tx, id)?;
                let project = owning_project(tx, &task)?;
                access::can_modify_task_details(actor, &task, &project, DetailChange::Delete)
                    .into_result()?;
                tx.delete_task(id)?;
                Ok(())
            })
            .await;

        match &result {
            Ok(()) => info!(task_id = %id, actor_id = %actor.id(), "deleted task"),
            Err(err) => log_denial(actor, "delete task", err),
        }
        result
    }
}

fn require_task(tx: &mut dyn TaskStoreTransaction, id: TaskId) -> TaskLifecycleResult<Task> {
    tx.find_task(id)?
        .ok_or(TaskLifecycleError::NotFound(EntityRef::Task(id)))
}

fn require_project(
    tx: &mut dyn TaskStoreTransaction,
    id: ProjectId,
) -> TaskLifecycleResult<Project> {
    tx.find_project(id)?
        .ok_or(TaskLifecycleError::NotFound(EntityRef::Project(id)))
}

fn owning_project(tx: &mut dyn TaskStoreTransaction, task: &Task) -> TaskLifecycleResult<Project> {
    require_project(tx, task.project_id())
}

fn require_user(tx: &mut dyn TaskStoreTransaction, id: UserId) -> TaskLifecycleResult<()> {
    tx.find_user(id)?
        .map(|_| ())
        .ok_or(TaskLifecycleError::NotFound(EntityRef::User(id)))
}

fn log_denial(actor: Actor, action: &'static str, err: &TaskLifecycleError) {
    if let TaskLifecycleError::AccessDenied(reason) = err {
        warn!(actor_id = %actor.id(), action, %reason, "task action denied");
    }
}

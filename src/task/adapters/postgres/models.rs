//! Diesel row models for task tracking persistence.

use super::schema::{projects, tasks, users};
use crate::task::{
    domain::{
        Email, NewProject, NewTask, NewUser, PersistedProjectData, PersistedTaskData, Project,
        ProjectDetails, ProjectId, Role, Task, TaskId, TaskPriority, TaskStatus, TaskTitle, User,
        UserId,
    },
    ports::TaskStoreError,
};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Store-assigned identity.
    pub id: i64,
    /// Normalized email address.
    pub email: String,
    /// Canonical role name.
    pub role: String,
    /// Opaque credential hash.
    pub credential_hash: String,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Normalized email address.
    pub email: String,
    /// Canonical role name.
    pub role: String,
    /// Opaque credential hash.
    pub credential_hash: String,
}

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Store-assigned identity.
    pub id: i64,
    /// Project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owning user.
    pub owner_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for project records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    /// Project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owning user.
    pub owner_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for project edits.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(treat_none_as_null = true)]
pub struct ProjectChangeset {
    /// Project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Store-assigned identity.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Canonical status name.
    pub status: String,
    /// Canonical priority name.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Owning project.
    pub project_id: i64,
    /// Optional assigned user.
    pub assigned_user_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Canonical status name.
    pub status: String,
    /// Canonical priority name.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Owning project.
    pub project_id: i64,
    /// Optional assigned user.
    pub assigned_user_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset written by task saves.
///
/// Every column is written, so a cleared assignment becomes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Canonical status name.
    pub status: String,
    /// Canonical priority name.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optional assigned user.
    pub assigned_user_id: Option<i64>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = TaskStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            id,
            email,
            role,
            credential_hash,
        } = row;
        let parsed_email = Email::new(email).map_err(TaskStoreError::persistence)?;
        let parsed_role = Role::try_from(role.as_str()).map_err(TaskStoreError::persistence)?;
        Ok(Self::from_persisted(
            UserId::new(id),
            parsed_email,
            parsed_role,
            credential_hash,
        ))
    }
}

impl From<&NewUser> for NewUserRow {
    fn from(user: &NewUser) -> Self {
        Self {
            email: user.email.as_str().to_owned(),
            role: user.role.as_str().to_owned(),
            credential_hash: user.credential_hash.clone(),
        }
    }
}

impl TryFrom<ProjectRow> for Project {
    type Error = TaskStoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let ProjectRow {
            id,
            name,
            description,
            owner_id,
            created_at,
            updated_at,
        } = row;
        let details = ProjectDetails::new(name, description).map_err(TaskStoreError::persistence)?;
        Ok(Self::from_persisted(PersistedProjectData {
            id: ProjectId::new(id),
            details,
            owner_id: UserId::new(owner_id),
            created_at,
            updated_at,
        }))
    }
}

impl From<&NewProject> for NewProjectRow {
    fn from(project: &NewProject) -> Self {
        Self {
            name: project.details.name().as_str().to_owned(),
            description: project.details.description().map(str::to_owned),
            owner_id: project.owner_id.value(),
            created_at: project.created_at,
            updated_at: project.created_at,
        }
    }
}

impl From<&Project> for ProjectChangeset {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name().as_str().to_owned(),
            description: project.description().map(str::to_owned),
            updated_at: project.updated_at(),
        }
    }
}

impl TryFrom<TaskRow> for Task {
    type Error = TaskStoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let TaskRow {
            id,
            title,
            description,
            status,
            priority,
            due_date,
            project_id,
            assigned_user_id,
            created_at,
            updated_at,
        } = row;
        let data = PersistedTaskData {
            id: TaskId::new(id),
            title: TaskTitle::new(title).map_err(TaskStoreError::persistence)?,
            description,
            status: TaskStatus::try_from(status.as_str()).map_err(TaskStoreError::persistence)?,
            priority: TaskPriority::try_from(priority.as_str())
                .map_err(TaskStoreError::persistence)?,
            due_date,
            project_id: ProjectId::new(project_id),
            assignee_id: assigned_user_id.map(UserId::new),
            created_at,
            updated_at,
        };
        Ok(Self::from_persisted(data))
    }
}

impl From<&NewTask> for NewTaskRow {
    fn from(task: &NewTask) -> Self {
        Self {
            title: task.title.as_str().to_owned(),
            description: task.description.clone(),
            status: task.status.as_str().to_owned(),
            priority: task.priority.as_str().to_owned(),
            due_date: task.due_date,
            project_id: task.project_id.value(),
            assigned_user_id: task.assignee_id.map(UserId::value),
            created_at: task.created_at,
            updated_at: task.created_at,
        }
    }
}

impl From<&Task> for TaskChangeset {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            status: task.status().as_str().to_owned(),
            priority: task.priority().as_str().to_owned(),
            due_date: task.due_date(),
            assigned_user_id: task.assignee_id().map(UserId::value),
            updated_at: task.updated_at(),
        }
    }
}

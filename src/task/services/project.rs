//! Service layer for project management.

use super::error::EntityRef;
use crate::task::{
    domain::{
        Actor, DenialReason, DetailChange, NewProject, Project, ProjectDetails, ProjectId,
        TaskDomainError, access,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreTransaction},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Name and description supplied when creating or editing a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    name: String,
    description: Option<String>,
}

impl ProjectRequest {
    /// Creates a request with the project name and no description.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn into_details(self) -> Result<ProjectDetails, TaskDomainError> {
        ProjectDetails::new(self.name, self.description)
    }
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// The project or acting user does not exist.
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

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project management service.
#[derive(Clone)]
pub struct ProjectService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync + 'static,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> ProjectService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a project owned by the actor.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::AccessDenied`] when the actor's role or
    /// the stored user's role cannot own projects, [`ProjectServiceError::NotFound`] when the actor
    /// is not a registered user, and [`ProjectServiceError::Validation`] for
    /// an invalid name or description.
    pub async fn create_project(
        &self,
        actor: Actor,
        request: ProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let details = request.into_details()?;
        let clock = Arc::clone(&self.clock);

        let result = self
            .store
            .transact(move |tx| -> ProjectServiceResult<Project> {
                access::can_create_project(actor).into_result()?;
                let owner = tx
                    .find_user(actor.id())?
                    .ok_or(ProjectServiceError::NotFound(EntityRef::User(actor.id())))?;
                // Owners must hold an owning role as stored, not only as claimed.
                access::can_create_project(Actor::from(&owner)).into_result()?;
                let project = tx.insert_project(NewProject::new(details, owner.id(), &*clock))?;
                Ok(project)
            })
            .await;

        match &result {
            Ok(project) => info!(
                project_id = %project.id(),
                owner_id = %project.owner_id(),
                "created project"
            ),
            Err(err) => log_denial(actor, "create project", err),
        }
        result
    }

    /// Retrieves a project by identity.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the project does not
    /// exist.
    pub async fn get_project(&self, id: ProjectId) -> ProjectServiceResult<Project> {
        self.store
            .transact(move |tx| require_project(tx, id))
            .await
    }

    /// Lists every project in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Store`] when the store fails.
    pub async fn list_projects(&self) -> ProjectServiceResult<Vec<Project>> {
        self.store
            .transact(|tx| -> ProjectServiceResult<Vec<Project>> { Ok(tx.list_projects()?) })
            .await
    }

    /// Replaces a project's name and description.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for an unknown project,
    /// [`ProjectServiceError::AccessDenied`] when the actor is not the owner,
    /// and [`ProjectServiceError::Validation`] for invalid input.
    pub async fn update_project(
        &self,
        actor: Actor,
        id: ProjectId,
        request: ProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let details = request.into_details()?;
        let clock = Arc::clone(&self.clock);

        let result = self
            .store
            .transact(move |tx| -> ProjectServiceResult<Project> {
                let mut project = require_project(tx, id)?;
                access::can_modify_project(actor, &project, DetailChange::Update).into_result()?;
                project.rename(details, &*clock);
                tx.save_project(&project)?;
                Ok(project)
            })
            .await;

        match &result {
            Ok(project) => info!(project_id = %project.id(), "updated project"),
            Err(err) => log_denial(actor, "update project", err),
        }
        result
    }

    /// Deletes a project and every task it owns.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for an unknown project and
    /// [`ProjectServiceError::AccessDenied`] when the actor is not the owner.
    pub async fn delete_project(&self, actor: Actor, id: ProjectId) -> ProjectServiceResult<()> {
        let result = self
            .store
            .transact(move |tx| -> ProjectServiceResult<()> {
                let project = require_project(tx, id)?;
                access::can_modify_project(actor, &project, DetailChange::Delete).into_result()?;
                tx.delete_project(id)?;
                Ok(())
            })
            .await;

        match &result {
            Ok(()) => info!(project_id = %id, actor_id = %actor.id(), "deleted project"),
            Err(err) => log_denial(actor, "delete project", err),
        }
        result
    }
}

fn require_project(
    tx: &mut dyn TaskStoreTransaction,
    id: ProjectId,
) -> ProjectServiceResult<Project> {
    tx.find_project(id)?
        .ok_or(ProjectServiceError::NotFound(EntityRef::Project(id)))
}

fn log_denial(actor: Actor, action: &'static str, err: &ProjectServiceError) {
    if let ProjectServiceError::AccessDenied(reason) = err {
        warn!(actor_id = %actor.id(), action, %reason, "project action denied");
    }
}

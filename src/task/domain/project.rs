//! Projects owned by managers.

use super::{ProjectId, ProjectName, TaskDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;

/// Longest accepted project description, in characters.
pub const MAX_PROJECT_DESCRIPTION_CHARS: usize = 1000;

/// Validated name and description of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetails {
    name: ProjectName,
    description: Option<String>,
}

impl ProjectDetails {
    /// Validates project details.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the name is blank or too long, or the
    /// description exceeds [`MAX_PROJECT_DESCRIPTION_CHARS`].
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, TaskDomainError> {
        let validated_name = ProjectName::new(name)?;
        if let Some(text) = description.as_deref() {
            let length = text.chars().count();
            if length > MAX_PROJECT_DESCRIPTION_CHARS {
                return Err(TaskDomainError::ProjectDescriptionTooLong(length));
            }
        }
        Ok(Self {
            name: validated_name,
            description,
        })
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the project description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Project aggregate.
///
/// The owner is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    id: ProjectId,
    details: ProjectDetails,
    owner_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identity.
    pub id: ProjectId,
    /// Persisted name and description.
    pub details: ProjectDetails,
    /// Persisted owner identity.
    pub owner_id: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            details: data.details,
            owner_id: data.owner_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identity.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        self.details.name()
    }

    /// Returns the project description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.details.description()
    }

    /// Returns the owning user's identity.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces name and description.
    pub fn rename(&mut self, details: ProjectDetails, clock: &impl Clock) {
        self.details = details;
        self.updated_at = clock.utc();
    }
}

/// Project awaiting an identity from the entity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Validated name and description.
    pub details: ProjectDetails,
    /// Owning user.
    pub owner_id: UserId,
    /// Creation timestamp, also used as the first update timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewProject {
    /// Prepares a project owned by `owner_id`, stamped with the clock time.
    #[must_use]
    pub fn new(details: ProjectDetails, owner_id: UserId, clock: &impl Clock) -> Self {
        Self {
            details,
            owner_id,
            created_at: clock.utc(),
        }
    }

    /// Materializes the project once the store has assigned an identity.
    #[must_use]
    pub fn into_project(self, id: ProjectId) -> Project {
        Project::from_persisted(PersistedProjectData {
            id,
            details: self.details,
            owner_id: self.owner_id,
            created_at: self.created_at,
            updated_at: self.created_at,
        })
    }
}

//! Access policy decisions for task and project mutations.
//!
//! Every function here is pure: callers resolve the entities first and act
//! on the returned [`AccessDecision`]. Two task mutation paths exist. The
//! project owner edits task details, and only the assignee reports progress
//! through the status-only path. Neither path grants the other.

use super::{Actor, Project, Task};
use thiserror::Error;

/// Reason attached to a denied decision.
///
/// The display text is fixed per action and is surfaced verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DenialReason {
    /// Actor does not own the project a task is being created in.
    #[error("Only the project owner can create tasks.")]
    NotOwnerToCreateTask,
    /// Actor does not own the project of the task being edited.
    #[error("Only the project owner can update task details.")]
    NotOwnerToUpdateTask,
    /// Actor does not own the project of the task being deleted.
    #[error("Only the project owner can delete tasks.")]
    NotOwnerToDeleteTask,
    /// Actor is not the task's assignee.
    #[error("Only the assigned user can update the task status.")]
    NotAssignee,
    /// Actor's role cannot own projects.
    #[error("Only managers can create projects.")]
    NotManager,
    /// Actor does not own the project being edited.
    #[error("Only the project owner can update the project.")]
    NotOwnerToUpdateProject,
    /// Actor does not own the project being deleted.
    #[error("Only the project owner can delete the project.")]
    NotOwnerToDeleteProject,
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum AccessDecision {
    /// The action may proceed.
    Allow,
    /// The action is refused for the given reason.
    Deny(DenialReason),
}

impl AccessDecision {
    const fn allow_if(condition: bool, reason: DenialReason) -> Self {
        if condition {
            Self::Allow
        } else {
            Self::Deny(reason)
        }
    }

    /// Returns `true` when the action may proceed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts the decision into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the [`DenialReason`] of a denied decision.
    pub const fn into_result(self) -> Result<(), DenialReason> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(reason),
        }
    }
}

/// Kind of owner-driven task change being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailChange {
    /// Full update of task fields and assignment.
    Update,
    /// Task deletion.
    Delete,
}

/// Allows task creation only for the project owner.
pub fn can_create_task(actor: Actor, project: &Project) -> AccessDecision {
    AccessDecision::allow_if(
        actor.id() == project.owner_id(),
        DenialReason::NotOwnerToCreateTask,
    )
}

/// Allows detail edits and deletion only for the owner of the task's
/// project.
///
/// `project` must be the project the task belongs to.
pub fn can_modify_task_details(
    actor: Actor,
    task: &Task,
    project: &Project,
    change: DetailChange,
) -> AccessDecision {
    debug_assert_eq!(task.project_id(), project.id());
    let reason = match change {
        DetailChange::Update => DenialReason::NotOwnerToUpdateTask,
        DetailChange::Delete => DenialReason::NotOwnerToDeleteTask,
    };
    AccessDecision::allow_if(actor.id() == project.owner_id(), reason)
}

/// Allows the status-only update only for the task's assignee.
///
/// Project ownership grants nothing here.
pub fn can_modify_task_status_only(actor: Actor, task: &Task) -> AccessDecision {
    AccessDecision::allow_if(
        task.assignee_id() == Some(actor.id()),
        DenialReason::NotAssignee,
    )
}

/// Allows project creation for managers and administrators.
pub const fn can_create_project(actor: Actor) -> AccessDecision {
    AccessDecision::allow_if(actor.role().can_own_projects(), DenialReason::NotManager)
}

/// Allows project edits and deletion only for its owner.
pub fn can_modify_project(actor: Actor, project: &Project, change: DetailChange) -> AccessDecision {
    let reason = match change {
        DetailChange::Update => DenialReason::NotOwnerToUpdateProject,
        DetailChange::Delete => DenialReason::NotOwnerToDeleteProject,
    };
    AccessDecision::allow_if(actor.id() == project.owner_id(), reason)
}

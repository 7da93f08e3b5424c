//! Application services for projects, tasks, and users.

mod directory;
mod error;
mod lifecycle;
mod project;

pub use directory::{
    RegisterUserRequest, UserDirectoryError, UserDirectoryResult, UserDirectoryService,
};
pub use error::EntityRef;
pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
    UpdateTaskRequest,
};
pub use project::{ProjectRequest, ProjectService, ProjectServiceError, ProjectServiceResult};

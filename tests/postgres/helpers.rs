//! Shared test helpers for `PostgreSQL` integration tests.

use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;
use rstest::fixture;
use task_tracker::{
    config::StoreConfig,
    task::{
        adapters::postgres::PostgresTaskStore,
        domain::{Actor, Project, Role},
        services::{
            ProjectRequest, ProjectService, RegisterUserRequest, TaskLifecycleService,
            UserDirectoryService,
        },
    },
};

/// Environment variable naming the test database.
pub const TEST_DATABASE_URL_VAR: &str = "TASK_TRACKER_TEST_DATABASE_URL";

/// Services wired over a migrated `PostgreSQL` store.
pub struct PgContext {
    /// The store shared by every service.
    pub store: Arc<PostgresTaskStore>,
    /// User registration.
    pub directory: UserDirectoryService<PostgresTaskStore>,
    /// Project administration.
    pub projects: ProjectService<PostgresTaskStore, DefaultClock>,
    /// Task lifecycle operations.
    pub tasks: TaskLifecycleService<PostgresTaskStore, DefaultClock>,
}

/// Connects to the test database and applies pending migrations.
///
/// Yields `None` when no test database is configured.
///
/// # Errors
///
/// Returns an error if the pool cannot be built or migrations fail.
#[fixture]
pub fn pg_context() -> Result<Option<PgContext>, eyre::Report> {
    let Some(url) = std::env::var_os(TEST_DATABASE_URL_VAR) else {
        return Ok(None);
    };
    let url = url
        .into_string()
        .map_err(|_| eyre::eyre!("{TEST_DATABASE_URL_VAR} is not valid UTF-8"))?;

    let config = StoreConfig::new(url).with_max_pool_size(2);
    let store = Arc::new(PostgresTaskStore::connect(&config)?);
    store.run_migrations()?;

    let clock = Arc::new(DefaultClock);
    Ok(Some(PgContext {
        directory: UserDirectoryService::new(Arc::clone(&store)),
        projects: ProjectService::new(Arc::clone(&store), Arc::clone(&clock)),
        tasks: TaskLifecycleService::new(Arc::clone(&store), clock),
        store,
    }))
}

/// Builds an email address no earlier run has registered.
pub fn unique_email(local: &str) -> String {
    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{local}-{stamp}@example.com")
}

/// A manager, a regular user and the manager's project.
pub struct SeededProject {
    /// Owner of `project`.
    pub manager: Actor,
    /// Registered user who does not own the project.
    pub user: Actor,
    /// The created project.
    pub project: Project,
}

/// Registers a manager and a user and creates a project for the manager.
///
/// # Errors
///
/// Returns an error if registration or project creation fails.
pub async fn seed_project(context: &PgContext) -> Result<SeededProject, eyre::Report> {
    let manager = context
        .directory
        .register(RegisterUserRequest::new(
            unique_email("manager"),
            Role::Manager,
            "manager-hash",
        ))
        .await?;
    let user = context
        .directory
        .register(RegisterUserRequest::new(
            unique_email("user"),
            Role::User,
            "user-hash",
        ))
        .await?;
    let project = context
        .projects
        .create_project(Actor::from(&manager), ProjectRequest::new("Website Redesign"))
        .await?;

    Ok(SeededProject {
        manager: Actor::from(&manager),
        user: Actor::from(&user),
        project,
    })
}

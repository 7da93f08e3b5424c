//! Shared world state for task access BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use task_tracker::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{Actor, Page, Project, Task},
    services::{
        ProjectService, TaskLifecycleError, TaskLifecycleService, UserDirectoryService,
    },
};

/// Task service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskStore, DefaultClock>;

/// Scenario world for task access behaviour tests.
pub struct TaskAccessWorld {
    pub directory: UserDirectoryService<InMemoryTaskStore>,
    pub projects: ProjectService<InMemoryTaskStore, DefaultClock>,
    pub tasks: TestTaskService,
    pub actors: HashMap<String, Actor>,
    pub named_projects: HashMap<String, Project>,
    pub named_tasks: HashMap<String, Task>,
    pub last_task_result: Option<Result<Task, TaskLifecycleError>>,
    pub last_page: Option<Page<Task>>,
}

impl TaskAccessWorld {
    /// Creates a world over a fresh in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTaskStore::new());
        let clock = Arc::new(DefaultClock);

        Self {
            directory: UserDirectoryService::new(Arc::clone(&store)),
            projects: ProjectService::new(Arc::clone(&store), Arc::clone(&clock)),
            tasks: TaskLifecycleService::new(store, clock),
            actors: HashMap::new(),
            named_projects: HashMap::new(),
            named_tasks: HashMap::new(),
            last_task_result: None,
            last_page: None,
        }
    }

    /// Looks up an actor registered earlier in the scenario.
    pub fn actor(&self, email: &str) -> Result<Actor, eyre::Report> {
        self.actors
            .get(email)
            .copied()
            .ok_or_else(|| eyre::eyre!("no actor registered as {email}"))
    }

    /// Looks up a project created earlier in the scenario.
    pub fn project(&self, name: &str) -> Result<&Project, eyre::Report> {
        self.named_projects
            .get(name)
            .ok_or_else(|| eyre::eyre!("no project named {name}"))
    }

    /// Looks up a task created earlier in the scenario.
    pub fn task(&self, label: &str) -> Result<&Task, eyre::Report> {
        self.named_tasks
            .get(label)
            .ok_or_else(|| eyre::eyre!("no task labelled {label}"))
    }
}

impl Default for TaskAccessWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskAccessWorld {
    TaskAccessWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

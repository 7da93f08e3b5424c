//! In-memory entity store for tests and local tooling.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{
        Email, NewProject, NewTask, NewUser, Page, Project, ProjectId, Task, TaskId, TaskQuery,
        User, UserId,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult, TaskStoreTransaction},
};

/// Thread-safe in-memory entity store.
///
/// Units of work are serialized behind a write lock and run against a
/// snapshot of the state that replaces the live state only on success.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Clone, Default)]
struct InMemoryState {
    users: BTreeMap<UserId, User>,
    projects: BTreeMap<ProjectId, Project>,
    tasks: BTreeMap<TaskId, Task>,
    last_user_id: i64,
    last_project_id: i64,
    last_task_id: i64,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_identity(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn transact<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TaskStoreTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TaskStoreError> + Send + 'static,
    {
        let mut live = self.state.write().map_err(|err| {
            E::from(TaskStoreError::persistence(std::io::Error::other(
                err.to_string(),
            )))
        })?;
        let mut snapshot = live.clone();
        let outcome = work(&mut snapshot)?;
        *live = snapshot;
        Ok(outcome)
    }
}

impl TaskStoreTransaction for InMemoryState {
    fn find_user(&mut self, id: UserId) -> TaskStoreResult<Option<User>> {
        Ok(self.users.get(&id).cloned())
    }

    fn find_user_by_email(&mut self, email: &Email) -> TaskStoreResult<Option<User>> {
        Ok(self
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    fn insert_user(&mut self, user: NewUser) -> TaskStoreResult<User> {
        if self.users.values().any(|existing| existing.email() == &user.email) {
            return Err(TaskStoreError::DuplicateEmail(user.email));
        }
        let id = UserId::new(next_identity(&mut self.last_user_id));
        let stored = User::from_persisted(id, user.email, user.role, user.credential_hash);
        self.users.insert(id, stored.clone());
        Ok(stored)
    }

    fn find_project(&mut self, id: ProjectId) -> TaskStoreResult<Option<Project>> {
        Ok(self.projects.get(&id).cloned())
    }

    fn list_projects(&mut self) -> TaskStoreResult<Vec<Project>> {
        Ok(self.projects.values().cloned().collect())
    }

    fn insert_project(&mut self, project: NewProject) -> TaskStoreResult<Project> {
        if !self.users.contains_key(&project.owner_id) {
            return Err(TaskStoreError::missing_reference(project.owner_id));
        }
        let id = ProjectId::new(next_identity(&mut self.last_project_id));
        let stored = project.into_project(id);
        self.projects.insert(id, stored.clone());
        Ok(stored)
    }

    fn save_project(&mut self, project: &Project) -> TaskStoreResult<()> {
        let slot = self
            .projects
            .get_mut(&project.id())
            .ok_or_else(|| TaskStoreError::missing_row(project.id()))?;
        *slot = project.clone();
        Ok(())
    }

    fn delete_project(&mut self, id: ProjectId) -> TaskStoreResult<()> {
        if self.projects.remove(&id).is_none() {
            return Err(TaskStoreError::missing_row(id));
        }
        self.tasks.retain(|_, task| task.project_id() != id);
        Ok(())
    }

    fn find_task(&mut self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        Ok(self.tasks.get(&id).cloned())
    }

    fn find_tasks(&mut self, query: &TaskQuery) -> TaskStoreResult<Page<Task>> {
        let mut matching: Vec<&Task> = self
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .collect();
        let sort = query.effective_sort();
        matching.sort_by(|left, right| sort.compare(left, right));

        let request = query.page();
        let total = u64::try_from(matching.len()).map_err(TaskStoreError::persistence)?;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(request.size()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(size)
            .cloned()
            .collect();
        Ok(Page::new(items, total, request))
    }

    fn insert_task(&mut self, task: NewTask) -> TaskStoreResult<Task> {
        if !self.projects.contains_key(&task.project_id) {
            return Err(TaskStoreError::missing_reference(task.project_id));
        }
        self.ensure_assignee_exists(task.assignee_id)?;
        let id = TaskId::new(next_identity(&mut self.last_task_id));
        let stored = task.into_task(id);
        self.tasks.insert(id, stored.clone());
        Ok(stored)
    }

    fn save_task(&mut self, task: &Task) -> TaskStoreResult<()> {
        self.ensure_assignee_exists(task.assignee_id())?;
        let slot = self
            .tasks
            .get_mut(&task.id())
            .ok_or_else(|| TaskStoreError::missing_row(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    fn delete_task(&mut self, id: TaskId) -> TaskStoreResult<()> {
        self.tasks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| TaskStoreError::missing_row(id))
    }
}

impl InMemoryState {
    fn ensure_assignee_exists(&self, assignee_id: Option<UserId>) -> TaskStoreResult<()> {
        match assignee_id {
            Some(id) if !self.users.contains_key(&id) => {
                Err(TaskStoreError::missing_reference(id))
            }
            _ => Ok(()),
        }
    }
}

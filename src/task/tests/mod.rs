//! Unit tests for the task tracker domain, store, and services.


use crate::task::domain::{
    PersistedProjectData, PersistedTaskData, Project, ProjectDetails, ProjectId, Task, TaskId,
    TaskPriority, TaskStatus, TaskTitle, UserId,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn project_owned_by(id: i64, owner: i64) -> Project {
    Project::from_persisted(PersistedProjectData {
        id: ProjectId::new(id),
        details: ProjectDetails::new("Website Redesign", None).expect("valid details"),
        owner_id: UserId::new(owner),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    })
}

struct TaskSpec {
    id: i64,
    project: i64,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    assignee: Option<i64>,
}

impl TaskSpec {
    const fn new(id: i64, project: i64) -> Self {
        Self {
            id,
            project,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
            assignee: None,
        }
    }

    const fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    const fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    const fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    const fn assigned_to(mut self, user: i64) -> Self {
        self.assignee = Some(user);
        self
    }

    fn build(self) -> Task {
        Task::from_persisted(PersistedTaskData {
            id: TaskId::new(self.id),
            title: TaskTitle::new(format!("Task {}", self.id)).expect("valid title"),
            description: None,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            project_id: ProjectId::new(self.project),
            assignee_id: self.assignee.map(UserId::new),
            created_at: fixed_time(),
            updated_at: fixed_time(),
        })
    }
}

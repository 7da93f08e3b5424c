//! Lifecycle services running over the `PostgreSQL` store.

use rstest::rstest;
use task_tracker::task::{
    domain::{DenialReason, PageRequest, Role, TaskPriority, TaskStatus},
    services::{
        CreateTaskRequest, EntityRef, ProjectServiceError, RegisterUserRequest,
        TaskLifecycleError, UpdateTaskRequest, UserDirectoryError,
    },
};

use crate::postgres::helpers::{PgContext, pg_context, seed_project, unique_email};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_and_assignee_drive_a_task_lifecycle(
    pg_context: Result<Option<PgContext>, eyre::Report>,
) -> Result<(), eyre::Report> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let seeded = seed_project(&context).await?;

    let created = context
        .tasks
        .create_task(
            seeded.manager,
            CreateTaskRequest::new(
                seeded.project.id(),
                "Design UI",
                TaskStatus::Todo,
                TaskPriority::High,
            )
            .with_assignee(seeded.user.id()),
        )
        .await?;

    let denied = context
        .tasks
        .update_task_status_only(seeded.manager, created.id(), TaskStatus::Done)
        .await;
    assert!(matches!(
        denied,
        Err(TaskLifecycleError::AccessDenied(DenialReason::NotAssignee))
    ));

    let progressed = context
        .tasks
        .update_task_status_only(seeded.user, created.id(), TaskStatus::InProgress)
        .await?;
    assert_eq!(progressed.status(), TaskStatus::InProgress);

    let renamed = context
        .tasks
        .update_task_details(
            seeded.manager,
            created.id(),
            UpdateTaskRequest::new()
                .with_title("Design UI v2")
                .with_assignee(seeded.user.id()),
        )
        .await?;
    assert_eq!(renamed.title().as_str(), "Design UI v2");
    assert_eq!(renamed.status(), TaskStatus::InProgress);
    assert_eq!(renamed.assignee_id(), Some(seeded.user.id()));

    let stored = context.tasks.get_task(created.id()).await?;
    assert_eq!(stored.title(), renamed.title());
    assert_eq!(stored.status(), TaskStatus::InProgress);
    assert_eq!(stored.priority(), TaskPriority::High);
    assert_eq!(stored.assignee_id(), Some(seeded.user.id()));

    context.tasks.delete_task(seeded.manager, created.id()).await?;
    let gone = context.tasks.get_task(created.id()).await;
    assert!(matches!(
        gone,
        Err(TaskLifecycleError::NotFound(EntityRef::Task(id))) if id == created.id()
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_timestamps_match_returned_tasks(
    pg_context: Result<Option<PgContext>, eyre::Report>,
) -> Result<(), eyre::Report> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let seeded = seed_project(&context).await?;

    let created = context
        .tasks
        .create_task(
            seeded.manager,
            CreateTaskRequest::new(
                seeded.project.id(),
                "Timestamped",
                TaskStatus::Todo,
                TaskPriority::Medium,
            ),
        )
        .await?;
    let fetched = context.tasks.get_task(created.id()).await?;
    assert_eq!(
        fetched.created_at().timestamp_micros(),
        created.created_at().timestamp_micros()
    );
    assert_eq!(
        fetched.updated_at().timestamp_micros(),
        created.updated_at().timestamp_micros()
    );

    let renamed = context
        .tasks
        .update_task_details(
            seeded.manager,
            created.id(),
            UpdateTaskRequest::new().with_title("Timestamped again"),
        )
        .await?;
    let refetched = context.tasks.get_task(created.id()).await?;
    assert_eq!(
        refetched.created_at().timestamp_micros(),
        created.created_at().timestamp_micros()
    );
    assert_eq!(
        refetched.updated_at().timestamp_micros(),
        renamed.updated_at().timestamp_micros()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_filters_by_status_within_the_project(
    pg_context: Result<Option<PgContext>, eyre::Report>,
) -> Result<(), eyre::Report> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let seeded = seed_project(&context).await?;
    for (title, status) in [
        ("Draft", TaskStatus::Todo),
        ("Build", TaskStatus::Done),
        ("Ship", TaskStatus::Done),
    ] {
        context
            .tasks
            .create_task(
                seeded.manager,
                CreateTaskRequest::new(seeded.project.id(), title, status, TaskPriority::Low),
            )
            .await?;
    }

    let done = context
        .tasks
        .list_tasks(
            seeded.project.id(),
            Some(TaskStatus::Done),
            None,
            PageRequest::new(0, 1)?,
        )
        .await?;

    assert_eq!(done.total(), 2);
    let titles: Vec<&str> = done.items().iter().map(|task| task.title().as_str()).collect();
    assert_eq!(titles, vec!["Build"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_removes_its_tasks(
    pg_context: Result<Option<PgContext>, eyre::Report>,
) -> Result<(), eyre::Report> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let seeded = seed_project(&context).await?;
    let task = context
        .tasks
        .create_task(
            seeded.manager,
            CreateTaskRequest::new(
                seeded.project.id(),
                "Cleanup",
                TaskStatus::Todo,
                TaskPriority::Medium,
            ),
        )
        .await?;

    let denied = context
        .projects
        .delete_project(seeded.user, seeded.project.id())
        .await;
    assert!(matches!(
        denied,
        Err(ProjectServiceError::AccessDenied(DenialReason::NotOwnerToDeleteProject))
    ));

    context
        .projects
        .delete_project(seeded.manager, seeded.project.id())
        .await?;

    assert!(matches!(
        context.tasks.get_task(task.id()).await,
        Err(TaskLifecycleError::NotFound(EntityRef::Task(_)))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registering_a_taken_email_is_rejected(
    pg_context: Result<Option<PgContext>, eyre::Report>,
) -> Result<(), eyre::Report> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let email = unique_email("taken");
    context
        .directory
        .register(RegisterUserRequest::new(email.clone(), Role::User, "first"))
        .await?;

    let second = context
        .directory
        .register(RegisterUserRequest::new(email, Role::Manager, "second"))
        .await;

    assert!(matches!(second, Err(UserDirectoryError::DuplicateEmail(_))));
    Ok(())
}

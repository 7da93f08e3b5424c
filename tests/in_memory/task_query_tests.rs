//! In-memory integration tests for filtered task listing.

use std::sync::Arc;

use super::helpers::{Tracker, create_owned_task, seed_tracker, store};
use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::rstest;
use task_tracker::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{
        Actor, PageRequest, SortDirection, TaskPriority, TaskQuery, TaskSort, TaskSortField, TaskStatus,
    },
    services::{CreateTaskRequest, ProjectRequest, ProjectService},
};

async fn seed_four_tasks(tracker: &Tracker) -> Result<(), eyre::Report> {
    create_owned_task(tracker, "Design UI", TaskStatus::Todo, TaskPriority::High).await?;
    create_owned_task(tracker, "Build API", TaskStatus::InProgress, TaskPriority::High).await?;
    create_owned_task(tracker, "Write docs", TaskStatus::Done, TaskPriority::Low).await?;
    create_owned_task(tracker, "Ship it", TaskStatus::Done, TaskPriority::High).await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unfiltered_listing_returns_every_task_in_creation_order(
    store: Arc<InMemoryTaskStore>,
) -> Result<(), eyre::Report> {
    let tracker = seed_tracker(store).await?;
    seed_four_tasks(&tracker).await?;

    let page = tracker
        .tasks
        .list_tasks(tracker.project.id(), None, None, PageRequest::new(0, 10)?)
        .await?;

    eyre::ensure!(page.total() == 4, "expected total 4, found {}", page.total());
    let titles: Vec<&str> = page.items().iter().map(|task| task.title().as_str()).collect();
    eyre::ensure!(
        titles == ["Design UI", "Build API", "Write docs", "Ship it"],
        "unexpected order: {titles:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_filter_narrows_to_matching_tasks(
    store: Arc<InMemoryTaskStore>,
) -> Result<(), eyre::Report> {
    let tracker = seed_tracker(store).await?;
    seed_four_tasks(&tracker).await?;

    let page = tracker
        .tasks
        .list_tasks(
            tracker.project.id(),
            Some(TaskStatus::Todo),
            None,
            PageRequest::default(),
        )
        .await?;

    eyre::ensure!(page.total() == 1, "expected total 1, found {}", page.total());
    eyre::ensure!(page.items().len() == 1, "expected one task on the page");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn combined_filters_report_full_total_on_short_pages(
    store: Arc<InMemoryTaskStore>,
) -> Result<(), eyre::Report> {
    let tracker = seed_tracker(store).await?;
    seed_four_tasks(&tracker).await?;
    create_owned_task(&tracker, "Retro", TaskStatus::Done, TaskPriority::High).await?;
    create_owned_task(&tracker, "Demo", TaskStatus::Done, TaskPriority::High).await?;

    let page = tracker
        .tasks
        .list_tasks(
            tracker.project.id(),
            Some(TaskStatus::Done),
            Some(TaskPriority::High),
            PageRequest::new(0, 2)?,
        )
        .await?;

    eyre::ensure!(page.total() == 3, "expected total 3, found {}", page.total());
    eyre::ensure!(page.items().len() == 2, "expected a short page of 2");
    eyre::ensure!(page.total_pages() == 2, "expected 2 pages");
    eyre::ensure!(
        page.items()
            .iter()
            .all(|task| task.status() == TaskStatus::Done && task.priority() == TaskPriority::High),
        "page holds a task outside the filter"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_is_scoped_to_the_project(
    store: Arc<InMemoryTaskStore>,
) -> Result<(), eyre::Report> {
    let tracker = seed_tracker(Arc::clone(&store)).await?;
    seed_four_tasks(&tracker).await?;
    let other = ProjectService::new(store, Arc::new(DefaultClock))
        .create_project(tracker.manager, ProjectRequest::new("Mobile App"))
        .await?;
    tracker
        .tasks
        .create_task(
            tracker.manager,
            CreateTaskRequest::new(other.id(), "Elsewhere", TaskStatus::Todo, TaskPriority::High),
        )
        .await?;

    let page = tracker
        .tasks
        .list_tasks(other.id(), None, None, PageRequest::default())
        .await?;

    eyre::ensure!(page.total() == 1, "expected only the other project's task");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn no_matches_and_pages_past_the_end_are_empty(
    store: Arc<InMemoryTaskStore>,
) -> Result<(), eyre::Report> {
    let tracker = seed_tracker(store).await?;
    seed_four_tasks(&tracker).await?;

    let none = tracker
        .tasks
        .list_tasks(
            tracker.project.id(),
            Some(TaskStatus::Todo),
            Some(TaskPriority::Low),
            PageRequest::default(),
        )
        .await?;
    eyre::ensure!(none.is_empty() && none.total() == 0, "expected an empty result");

    let beyond = tracker
        .tasks
        .list_tasks(tracker.project.id(), None, None, PageRequest::new(3, 2)?)
        .await?;
    eyre::ensure!(beyond.is_empty(), "expected no items past the last page");
    eyre::ensure!(beyond.total() == 4, "expected the full total past the last page");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn explicit_due_date_sort_places_undated_tasks_last(
    store: Arc<InMemoryTaskStore>,
) -> Result<(), eyre::Report> {
    let tracker = seed_tracker(store).await?;
    let owner: Actor = tracker.manager;
    let project_id = tracker.project.id();
    let dated = |title: &str, day: u32| -> Result<CreateTaskRequest, eyre::Report> {
        let due = NaiveDate::from_ymd_opt(2025, 6, day)
            .ok_or_else(|| eyre::eyre!("invalid day {day}"))?;
        Ok(
            CreateTaskRequest::new(project_id, title, TaskStatus::Todo, TaskPriority::Medium)
                .with_due_date(due),
        )
    };
    tracker.tasks.create_task(owner, dated("Mid", 15)?).await?;
    create_owned_task(&tracker, "Someday", TaskStatus::Todo, TaskPriority::Medium).await?;
    tracker.tasks.create_task(owner, dated("Soon", 1)?).await?;
    tracker.tasks.create_task(owner, dated("Late", 30)?).await?;

    let query = TaskQuery::for_project(project_id)
        .with_sort(TaskSort::new(TaskSortField::DueDate, SortDirection::Desc));
    let page = tracker.tasks.query_tasks(query).await?;

    let titles: Vec<&str> = page.items().iter().map(|task| task.title().as_str()).collect();
    eyre::ensure!(
        titles == ["Late", "Mid", "Soon", "Someday"],
        "unexpected order: {titles:?}"
    );
    Ok(())
}

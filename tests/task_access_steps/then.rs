//! Then steps for task access BDD scenarios.

use super::world::{TaskAccessWorld, run_async};
use rstest_bdd_macros::then;
use task_tracker::task::{domain::TaskStatus, services::TaskLifecycleError};

#[then(r#"the task belongs to project "{project}" with status "{status}""#)]
fn task_belongs_to_project(
    world: &TaskAccessWorld,
    project: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected_project = world.project(&project)?.id();
    let expected_status = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = match world.last_task_result.as_ref() {
        Some(Ok(task)) => task,
        Some(Err(err)) => return Err(eyre::eyre!("task action failed: {err}")),
        None => return Err(eyre::eyre!("missing task result")),
    };

    eyre::ensure!(task.project_id() == expected_project, "task in wrong project");
    eyre::ensure!(
        task.status() == expected_status,
        "expected status {}, found {}",
        expected_status.as_str(),
        task.status().as_str()
    );
    Ok(())
}

#[then(r#"the action is denied with "{reason}""#)]
fn action_is_denied(world: &TaskAccessWorld, reason: String) -> Result<(), eyre::Report> {
    let result = world
        .last_task_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task result"))?;

    let Err(TaskLifecycleError::AccessDenied(denial)) = result else {
        return Err(eyre::eyre!("expected access denial, got {result:?}"));
    };
    eyre::ensure!(
        denial.to_string() == reason,
        "expected reason '{reason}', found '{denial}'"
    );
    Ok(())
}

#[then(r#"task "{label}" has status "{status}""#)]
fn task_has_status(
    world: &TaskAccessWorld,
    label: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world.task(&label)?.id();
    let stored = run_async(world.tasks.get_task(task_id))?;

    eyre::ensure!(
        stored.status() == expected,
        "expected status {}, found {}",
        expected.as_str(),
        stored.status().as_str()
    );
    Ok(())
}

#[then("{count:usize} tasks are returned out of {total:u64}")]
fn tasks_are_returned(
    world: &TaskAccessWorld,
    count: usize,
    total: u64,
) -> Result<(), eyre::Report> {
    let page = world
        .last_page
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing listed page"))?;

    eyre::ensure!(
        page.items().len() == count,
        "expected {count} tasks on the page, found {}",
        page.items().len()
    );
    eyre::ensure!(
        page.total() == total,
        "expected total {total}, found {}",
        page.total()
    );
    Ok(())
}

//! `PostgreSQL` entity store implementation for task tracking.

use super::{
    models::{
        NewProjectRow, NewTaskRow, NewUserRow, ProjectChangeset, ProjectRow, TaskChangeset,
        TaskRow, UserRow,
    },
    schema::{projects, tasks, users},
};
use crate::config::StoreConfig;
use crate::task::{
    domain::{
        Email, NewProject, NewTask, NewUser, Page, Project, ProjectId, SortDirection, Task,
        TaskFilter, TaskId, TaskQuery, TaskSort, TaskSortField, User, UserId,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult, TaskStoreTransaction},
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::sync::Arc;
use tracing::{debug, info};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema migrations bundled with the crate.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const USERS_EMAIL_UNIQUE: &str = "users_email_unique";

/// `PostgreSQL`-backed entity store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the pool cannot be built.
    pub fn connect(config: &StoreConfig) -> TaskStoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(config.database_url());
        let pool = Pool::builder()
            .max_size(config.max_pool_size())
            .connection_timeout(config.connection_timeout())
            .build(manager)
            .map_err(TaskStoreError::persistence)?;
        Ok(Self::new(pool))
    }

    /// Applies pending schema migrations, returning how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when a connection cannot be
    /// obtained or a migration fails.
    pub fn run_migrations(&self) -> TaskStoreResult<usize> {
        let mut pooled = self.pool.get().map_err(TaskStoreError::persistence)?;
        let connection: &mut PgConnection = &mut pooled;
        let applied = connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| TaskStoreError::Persistence(Arc::from(err)))?;
        for version in &applied {
            info!(%version, "applied migration");
        }
        Ok(applied.len())
    }
}

/// Failure inside a Diesel transaction: either the unit of work refused,
/// or the database did.
enum TransactionFailure<E> {
    Work(E),
    Database(DieselError),
}

impl<E> From<DieselError> for TransactionFailure<E> {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

impl<E: From<TaskStoreError>> TransactionFailure<E> {
    fn into_caller_error(self) -> E {
        match self {
            Self::Work(err) => err,
            Self::Database(err) => E::from(TaskStoreError::persistence(err)),
        }
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn transact<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TaskStoreTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TaskStoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut pooled = pool
                .get()
                .map_err(|err| E::from(TaskStoreError::persistence(err)))?;
            let connection: &mut PgConnection = &mut pooled;
            connection
                .transaction::<T, TransactionFailure<E>, _>(|tx| {
                    let mut unit = PgTransaction { connection: tx };
                    work(&mut unit).map_err(TransactionFailure::Work)
                })
                .map_err(TransactionFailure::into_caller_error)
        })
        .await
        .map_err(|err| E::from(TaskStoreError::persistence(err)))?
    }
}

/// Unit of work bound to one open database transaction.
struct PgTransaction<'c> {
    connection: &'c mut PgConnection,
}

impl TaskStoreTransaction for PgTransaction<'_> {
    fn find_user(&mut self, id: UserId) -> TaskStoreResult<Option<User>> {
        let connection = &mut *self.connection;
        users::table
            .find(id.value())
            .select(UserRow::as_select())
            .first::<UserRow>(connection)
            .optional()
            .map_err(TaskStoreError::persistence)?
            .map(User::try_from)
            .transpose()
    }

    fn find_user_by_email(&mut self, email: &Email) -> TaskStoreResult<Option<User>> {
        let connection = &mut *self.connection;
        users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first::<UserRow>(connection)
            .optional()
            .map_err(TaskStoreError::persistence)?
            .map(User::try_from)
            .transpose()
    }

    fn insert_user(&mut self, user: NewUser) -> TaskStoreResult<User> {
        let connection = &mut *self.connection;
        let row = NewUserRow::from(&user);
        let id = diesel::insert_into(users::table)
            .values(&row)
            .returning(users::id)
            .get_result::<i64>(connection)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                    if is_constraint(info.as_ref(), USERS_EMAIL_UNIQUE) =>
                {
                    TaskStoreError::DuplicateEmail(user.email.clone())
                }
                _ => map_write_error(err),
            })?;
        Ok(User::from_persisted(
            UserId::new(id),
            user.email,
            user.role,
            user.credential_hash,
        ))
    }

    fn find_project(&mut self, id: ProjectId) -> TaskStoreResult<Option<Project>> {
        let connection = &mut *self.connection;
        projects::table
            .find(id.value())
            .select(ProjectRow::as_select())
            .first::<ProjectRow>(connection)
            .optional()
            .map_err(TaskStoreError::persistence)?
            .map(Project::try_from)
            .transpose()
    }

    fn list_projects(&mut self) -> TaskStoreResult<Vec<Project>> {
        let connection = &mut *self.connection;
        let rows = projects::table
            .order(projects::id.asc())
            .select(ProjectRow::as_select())
            .load::<ProjectRow>(connection)
            .map_err(TaskStoreError::persistence)?;
        rows.into_iter().map(Project::try_from).collect()
    }

    fn insert_project(&mut self, project: NewProject) -> TaskStoreResult<Project> {
        let connection = &mut *self.connection;
        let row = NewProjectRow::from(&project);
        let id = diesel::insert_into(projects::table)
            .values(&row)
            .returning(projects::id)
            .get_result::<i64>(connection)
            .map_err(map_write_error)?;
        Ok(project.into_project(ProjectId::new(id)))
    }

    fn save_project(&mut self, project: &Project) -> TaskStoreResult<()> {
        let connection = &mut *self.connection;
        let updated = diesel::update(projects::table.find(project.id().value()))
            .set(&ProjectChangeset::from(project))
            .execute(connection)
            .map_err(map_write_error)?;
        require_affected(updated, project.id())
    }

    fn delete_project(&mut self, id: ProjectId) -> TaskStoreResult<()> {
        let connection = &mut *self.connection;
        let deleted = diesel::delete(projects::table.find(id.value()))
            .execute(connection)
            .map_err(TaskStoreError::persistence)?;
        require_affected(deleted, id)
    }

    fn find_task(&mut self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let connection = &mut *self.connection;
        tasks::table
            .find(id.value())
            .select(TaskRow::as_select())
            .first::<TaskRow>(connection)
            .optional()
            .map_err(TaskStoreError::persistence)?
            .map(Task::try_from)
            .transpose()
    }

    fn find_tasks(&mut self, query: &TaskQuery) -> TaskStoreResult<Page<Task>> {
        let connection = &mut *self.connection;
        let request = query.page();
        let limit = i64::from(request.size());
        let offset = i64::try_from(request.offset()).map_err(TaskStoreError::persistence)?;
        debug!(
            filters = query.filters().len(),
            page = request.page(),
            size = request.size(),
            "loading task page"
        );

        let total = filtered_tasks(query)
            .count()
            .get_result::<i64>(connection)
            .map_err(TaskStoreError::persistence)?;
        let rows = ordered(filtered_tasks(query), query.effective_sort())
            .select(TaskRow::as_select())
            .limit(limit)
            .offset(offset)
            .load::<TaskRow>(connection)
            .map_err(TaskStoreError::persistence)?;

        let items = rows
            .into_iter()
            .map(Task::try_from)
            .collect::<TaskStoreResult<Vec<_>>>()?;
        let total_count = u64::try_from(total).map_err(TaskStoreError::persistence)?;
        Ok(Page::new(items, total_count, request))
    }

    fn insert_task(&mut self, task: NewTask) -> TaskStoreResult<Task> {
        let connection = &mut *self.connection;
        let row = NewTaskRow::from(&task);
        let id = diesel::insert_into(tasks::table)
            .values(&row)
            .returning(tasks::id)
            .get_result::<i64>(connection)
            .map_err(map_write_error)?;
        Ok(task.into_task(TaskId::new(id)))
    }

    fn save_task(&mut self, task: &Task) -> TaskStoreResult<()> {
        let connection = &mut *self.connection;
        let updated = diesel::update(tasks::table.find(task.id().value()))
            .set(&TaskChangeset::from(task))
            .execute(connection)
            .map_err(map_write_error)?;
        require_affected(updated, task.id())
    }

    fn delete_task(&mut self, id: TaskId) -> TaskStoreResult<()> {
        let connection = &mut *self.connection;
        let deleted = diesel::delete(tasks::table.find(id.value()))
            .execute(connection)
            .map_err(TaskStoreError::persistence)?;
        require_affected(deleted, id)
    }
}

/// Builds the AND-joined filter predicate for a task query.
fn filtered_tasks(query: &TaskQuery) -> tasks::BoxedQuery<'static, Pg> {
    query
        .filters()
        .iter()
        .fold(tasks::table.into_boxed(), |boxed, filter| match *filter {
            TaskFilter::Project(project_id) => {
                boxed.filter(tasks::project_id.eq(project_id.value()))
            }
            TaskFilter::Status(status) => boxed.filter(tasks::status.eq(status.as_str())),
            TaskFilter::Priority(priority) => boxed.filter(tasks::priority.eq(priority.as_str())),
        })
}

/// Applies the requested ordering, breaking ties by identity.
fn ordered(
    boxed: tasks::BoxedQuery<'static, Pg>,
    sort: TaskSort,
) -> tasks::BoxedQuery<'static, Pg> {
    let sorted = match (sort.field, sort.direction) {
        (TaskSortField::Id, SortDirection::Asc) => return boxed.order(tasks::id.asc()),
        (TaskSortField::Id, SortDirection::Desc) => return boxed.order(tasks::id.desc()),
        (TaskSortField::CreatedAt, SortDirection::Asc) => boxed.order(tasks::created_at.asc()),
        (TaskSortField::CreatedAt, SortDirection::Desc) => boxed.order(tasks::created_at.desc()),
        (TaskSortField::DueDate, SortDirection::Asc) => {
            boxed.order(tasks::due_date.asc().nulls_last())
        }
        (TaskSortField::DueDate, SortDirection::Desc) => {
            boxed.order(tasks::due_date.desc().nulls_last())
        }
    };
    sorted.then_order_by(tasks::id.asc())
}

fn require_affected(rows: usize, identity: impl std::fmt::Display) -> TaskStoreResult<()> {
    if rows == 0 {
        return Err(TaskStoreError::missing_row(identity));
    }
    Ok(())
}

fn map_write_error(err: DieselError) -> TaskStoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info) => {
            TaskStoreError::missing_reference(info.constraint_name().unwrap_or("row"))
        }
        _ => TaskStoreError::persistence(err),
    }
}

fn is_constraint(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}

//! Filtered, paginated task retrieval requests.
//!
//! A [`TaskQuery`] is a plain value: a list of equality constraints joined
//! with logical AND, a page selector, and an optional sort. Storage adapters
//! interpret it; nothing here touches storage.

use super::{ProjectId, Task, TaskDomainError, TaskPriority, TaskStatus};
use std::cmp::Ordering;

/// Page size used when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Equality constraint on a task field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    /// Task belongs to the project.
    Project(ProjectId),
    /// Task has the status.
    Status(TaskStatus),
    /// Task has the priority.
    Priority(TaskPriority),
}

impl TaskFilter {
    /// Returns `true` when the task satisfies the constraint.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::Project(project_id) => task.project_id() == project_id,
            Self::Status(status) => task.status() == status,
            Self::Priority(priority) => task.priority() == priority,
        }
    }
}

/// Zero-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Creates a page selector.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPageSize`] when `size` is zero.
    pub const fn new(page: u32, size: u32) -> Result<Self, TaskDomainError> {
        if size == 0 {
            return Err(TaskDomainError::InvalidPageSize(size));
        }
        Ok(Self { page, size })
    }

    /// Returns the zero-based page index.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the maximum number of items on the page.
    #[must_use]
    pub const fn size(self) -> u32 {
        self.size
    }

    /// Returns the number of items preceding the page.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Field a task page may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortField {
    /// Store identity (creation order).
    Id,
    /// Creation timestamp.
    CreatedAt,
    /// Due date; undated tasks always come last.
    DueDate,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// Explicit ordering for a task page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSort {
    /// Field to order by.
    pub field: TaskSortField,
    /// Direction to order in.
    pub direction: SortDirection,
}

impl TaskSort {
    /// Creates an ordering.
    #[must_use]
    pub const fn new(field: TaskSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Compares two tasks under this ordering.
    #[must_use]
    pub fn compare(self, left: &Task, right: &Task) -> Ordering {
        let ordering = match self.field {
            TaskSortField::Id => left.id().cmp(&right.id()),
            TaskSortField::CreatedAt => left.created_at().cmp(&right.created_at()),
            TaskSortField::DueDate => {
                return match (left.due_date(), right.due_date()) {
                    (Some(a), Some(b)) => self.directed(a.cmp(&b)),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
            }
        };
        self.directed(ordering)
    }

    const fn directed(self, ordering: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl Default for TaskSort {
    fn default() -> Self {
        Self::new(TaskSortField::Id, SortDirection::Asc)
    }
}

/// Project-scoped task retrieval request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    filters: Vec<TaskFilter>,
    page: PageRequest,
    sort: Option<TaskSort>,
}

impl TaskQuery {
    /// Starts a query scoped to one project, first page, default size.
    #[must_use]
    pub fn for_project(project_id: ProjectId) -> Self {
        Self {
            filters: vec![TaskFilter::Project(project_id)],
            page: PageRequest::default(),
            sort: None,
        }
    }

    /// Narrows to the status when one is supplied.
    #[must_use]
    pub fn with_status(mut self, status: Option<TaskStatus>) -> Self {
        if let Some(value) = status {
            self.filters.push(TaskFilter::Status(value));
        }
        self
    }

    /// Narrows to the priority when one is supplied.
    #[must_use]
    pub fn with_priority(mut self, priority: Option<TaskPriority>) -> Self {
        if let Some(value) = priority {
            self.filters.push(TaskFilter::Priority(value));
        }
        self
    }

    /// Selects the page to return.
    #[must_use]
    pub const fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Requests an explicit ordering.
    #[must_use]
    pub const fn with_sort(mut self, sort: TaskSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Returns the AND-joined constraints. The project scope comes first.
    #[must_use]
    pub fn filters(&self) -> &[TaskFilter] {
        &self.filters
    }

    /// Returns the page selector.
    #[must_use]
    pub const fn page(&self) -> PageRequest {
        self.page
    }

    /// Returns the explicit ordering, if one was requested.
    #[must_use]
    pub const fn sort(&self) -> Option<TaskSort> {
        self.sort
    }

    /// Returns the ordering to apply, falling back to identity ascending.
    #[must_use]
    pub fn effective_sort(&self) -> TaskSort {
        self.sort.unwrap_or_default()
    }

    /// Returns `true` when the task satisfies every constraint.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.filters.iter().all(|filter| filter.matches(task))
    }
}

/// One page of results plus the size of the full matching set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Creates a page.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Returns the items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the number of items matching the query across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the page selector that produced this page.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Returns the number of pages needed for the full matching set.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.request.size()))
    }

    /// Returns `true` when the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maps every item, keeping totals.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

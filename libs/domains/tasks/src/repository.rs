use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::{Page, SortOrder};

use crate::entity;
use crate::error::TaskResult;
use crate::filter::TaskFilter;
use crate::models::{CreateTask, Task, UpdateTask};

/// Repository trait for Task persistence
///
/// Every read or write takes `now` and returns tasks whose status has been
/// re-derived against it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a task under an existing project
    async fn create(
        &self,
        project_id: i32,
        input: CreateTask,
        now: DateTime<Utc>,
    ) -> TaskResult<Task>;

    /// Get a task by ID
    async fn get_by_id(&self, id: i32, now: DateTime<Utc>) -> TaskResult<Option<Task>>;

    /// One window of a project's tasks matching `filter`
    async fn list(
        &self,
        project_id: i32,
        filter: TaskFilter,
        page: Page,
        order: Option<SortOrder<entity::Column>>,
        now: DateTime<Utc>,
    ) -> TaskResult<Vec<Task>>;

    /// Count a project's tasks matching `filter`
    async fn count(&self, project_id: i32, filter: TaskFilter) -> TaskResult<u64>;

    /// Apply a partial update; fails with `NotFound` for an unknown id
    async fn update(&self, id: i32, input: UpdateTask, now: DateTime<Utc>) -> TaskResult<Task>;

    /// Delete a task
    async fn delete(&self, id: i32) -> TaskResult<Task>;
}

use async_trait::async_trait;
use database::{Page, SortOrder};

use crate::entity;
use crate::error::ProjectResult;
use crate::models::{CreateProject, Project, UpdateProject};

/// Repository trait for Project persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a new project
    async fn create(&self, input: CreateProject) -> ProjectResult<Project>;

    /// Get a project by ID
    async fn get_by_id(&self, id: i32) -> ProjectResult<Option<Project>>;

    /// One window of projects, ordered by `order` then id
    async fn list(
        &self,
        page: Page,
        order: Option<SortOrder<entity::Column>>,
    ) -> ProjectResult<Vec<Project>>;

    /// Count all projects
    async fn count(&self) -> ProjectResult<u64>;

    /// Apply a partial update; fails with `NotFound` for an unknown id
    async fn update(&self, id: i32, input: UpdateProject) -> ProjectResult<Project>;

    /// Delete a project and, through the foreign key, its tasks
    async fn delete(&self, id: i32) -> ProjectResult<Project>;
}

use database::{Page, PageLimits, SortOrder};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProjectError, ProjectResult};
use crate::models::{CreateProject, ListParams, Project, SORTABLE_COLUMNS, UpdateProject};
use crate::repository::ProjectRepository;

/// Service layer for Project business logic
///
/// Every input is validated here, before the repository is touched.
pub struct ProjectService<R: ProjectRepository> {
    repository: Arc<R>,
    limits: PageLimits,
}

impl<R: ProjectRepository> Clone for ProjectService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            limits: self.limits,
        }
    }
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            limits: PageLimits::default(),
        }
    }

    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    #[instrument(skip(self, input), fields(project_name = %input.name))]
    pub async fn create_project(&self, input: CreateProject) -> ProjectResult<Project> {
        input.validate()?;
        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_project(&self, id: i32) -> ProjectResult<Project> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProjectError::NotFound(id))
    }

    /// One page of projects plus the total number of projects.
    #[instrument(skip(self))]
    pub async fn list_projects(&self, params: ListParams) -> ProjectResult<(Vec<Project>, u64)> {
        let page = Page::from_params(params.skip, params.limit, &self.limits)?;
        let order = SortOrder::parse(params.order_by.as_deref(), params.order, SORTABLE_COLUMNS)?;

        let projects = self.repository.list(page, order).await?;
        let total = self.repository.count().await?;
        Ok((projects, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_project(&self, id: i32, input: UpdateProject) -> ProjectResult<Project> {
        input.validate()?;
        self.repository.update(id, input).await
    }

    /// Deletes the project together with its tasks.
    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: i32) -> ProjectResult<()> {
        self.repository.delete(id).await.map(|_| ())
    }
}

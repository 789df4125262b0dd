use chrono::Utc;
use database::{Page, PageLimits, SortOrder};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::filter::TaskFilter;
use crate::models::{CreateTask, SORTABLE_COLUMNS, Task, TaskListParams, UpdateTask};
use crate::repository::TaskRepository;

/// Service layer for Task business logic
///
/// Inputs are validated before the repository is touched, and the clock is
/// read once per call so every task in a response is judged against the
/// same instant.
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
    limits: PageLimits,
}

impl<R: TaskRepository> Clone for TaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            limits: self.limits,
        }
    }
}

impl<R: TaskRepository> TaskService<R> {
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

    #[instrument(skip(self, input), fields(task_title = %input.title))]
    pub async fn create_task(&self, project_id: i32, input: CreateTask) -> TaskResult<Task> {
        input.validate()?;
        self.repository.create(project_id, input, Utc::now()).await
    }

    #[instrument(skip(self))]
    pub async fn get_task(&self, id: i32) -> TaskResult<Task> {
        self.repository
            .get_by_id(id, Utc::now())
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// One page of a project's tasks plus the number of tasks matching the filter.
    #[instrument(skip(self), fields(project_id = params.project_id))]
    pub async fn list_tasks(&self, params: TaskListParams) -> TaskResult<(Vec<Task>, u64)> {
        params.validate()?;
        let page = Page::from_params(params.skip, params.limit, &self.limits)?;
        let order = SortOrder::parse(params.order_by.as_deref(), params.order, SORTABLE_COLUMNS)?;
        let filter = TaskFilter::from_params(
            params.status,
            params.due_date_from.as_deref(),
            params.due_date_to.as_deref(),
        )?;

        let tasks = self
            .repository
            .list(params.project_id, filter, page, order, Utc::now())
            .await?;
        let total = self.repository.count(params.project_id, filter).await?;
        Ok((tasks, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_task(&self, id: i32, input: UpdateTask) -> TaskResult<Task> {
        input.validate()?;
        self.repository.update(id, input, Utc::now()).await
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: i32) -> TaskResult<()> {
        self.repository.delete(id).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::repository::MockTaskRepository;
    use database::{PageError, SortDirection};
    use mockall::predicate::{always, eq};

    fn task(id: i32, status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            id,
            project_id: 1,
            title: "T".to_string(),
            description: "D".to_string(),
            due_date: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn list_params() -> TaskListParams {
        TaskListParams {
            project_id: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_without_touching_repository() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_create().never();

        let service = TaskService::new(mock_repo);
        let result = service
            .create_task(
                1,
                CreateTask {
                    title: "T".to_string(),
                    description: String::new(),
                    due_date: Some("2024-99-99".to_string()),
                    status: TaskStatus::Todo,
                },
            )
            .await;

        let errors = match result {
            Err(TaskError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        };
        let fields = errors.field_errors();
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("due_date"));
    }

    #[tokio::test]
    async fn create_passes_project_through() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_create()
            .with(eq(7), always(), always())
            .times(1)
            .returning(|project_id, _, _| {
                let mut created = task(1, TaskStatus::Todo);
                created.project_id = project_id;
                Ok(created)
            });

        let service = TaskService::new(mock_repo);
        let created = service
            .create_task(
                7,
                CreateTask {
                    title: "T".to_string(),
                    description: "D".to_string(),
                    due_date: None,
                    status: TaskStatus::Todo,
                },
            )
            .await
            .unwrap();

        assert_eq!(created.project_id, 7);
    }

    #[tokio::test]
    async fn create_surfaces_missing_project() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_create()
            .returning(|project_id, _, _| Err(TaskError::ProjectNotFound(project_id)));

        let service = TaskService::new(mock_repo);
        let result = service
            .create_task(
                99,
                CreateTask {
                    title: "T".to_string(),
                    description: "D".to_string(),
                    due_date: None,
                    status: TaskStatus::Todo,
                },
            )
            .await;

        assert!(matches!(result, Err(TaskError::ProjectNotFound(99))));
    }

    #[tokio::test]
    async fn get_missing_task_is_not_found() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(5), always())
            .returning(|_, _| Ok(None));

        let service = TaskService::new(mock_repo);
        assert!(matches!(
            service.get_task(5).await,
            Err(TaskError::NotFound(5))
        ));
    }

    #[tokio::test]
    async fn list_rejects_bad_window_before_querying() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_list().never();
        mock_repo.expect_count().never();

        let service = TaskService::new(mock_repo);
        let result = service
            .list_tasks(TaskListParams {
                skip: Some(-1),
                ..list_params()
            })
            .await;

        assert!(matches!(
            result,
            Err(TaskError::Pagination(PageError::InvalidWindow))
        ));
    }

    #[tokio::test]
    async fn list_rejects_malformed_due_date_before_querying() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_list().never();

        let service = TaskService::new(mock_repo);
        let result = service
            .list_tasks(TaskListParams {
                due_date_to: Some("whenever".to_string()),
                ..list_params()
            })
            .await;

        assert!(matches!(result, Err(TaskError::InvalidDueDate(_))));
    }

    #[tokio::test]
    async fn list_rejects_non_positive_project_id() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_list().never();

        let service = TaskService::new(mock_repo);
        let result = service
            .list_tasks(TaskListParams {
                project_id: 0,
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(TaskError::Validation(_))));
    }

    #[tokio::test]
    async fn list_builds_filter_window_and_order() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_list()
            .withf(|project_id, filter, page, order, _| {
                *project_id == 3
                    && filter.status == Some(TaskStatus::Overdue)
                    && filter.due_date_from.is_some()
                    && filter.due_date_to.is_none()
                    && *page == Page { skip: 5, limit: 500 }
                    && matches!(
                        order,
                        Some(SortOrder {
                            column: crate::entity::Column::DueDate,
                            direction: SortDirection::Desc,
                        })
                    )
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok(vec![task(1, TaskStatus::Overdue)]));
        mock_repo
            .expect_count()
            .withf(|project_id, filter| *project_id == 3 && filter.status == Some(TaskStatus::Overdue))
            .times(1)
            .returning(|_, _| Ok(12));

        let service = TaskService::new(mock_repo);
        let (tasks, total) = service
            .list_tasks(TaskListParams {
                project_id: 3,
                skip: Some(5),
                limit: Some(10_000),
                status: Some(TaskStatus::Overdue),
                due_date_from: Some("2024-01-01".to_string()),
                order_by: Some("due_date".to_string()),
                order: Some(SortDirection::Desc),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(total, 12);
    }

    #[tokio::test]
    async fn list_rejects_unknown_order_column() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_list().never();

        let service = TaskService::new(mock_repo);
        let result = service
            .list_tasks(TaskListParams {
                order_by: Some("project_id; drop table tasks".to_string()),
                ..list_params()
            })
            .await;

        assert!(matches!(
            result,
            Err(TaskError::Pagination(PageError::UnknownColumn(_)))
        ));
    }

    #[tokio::test]
    async fn update_validates_before_repository() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_update().never();

        let service = TaskService::new(mock_repo);
        let result = service
            .update_task(
                1,
                UpdateTask {
                    title: Some(String::new()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(TaskError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_missing_task_is_not_found() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_delete()
            .with(eq(8))
            .returning(|id| Err(TaskError::NotFound(id)));

        let service = TaskService::new(mock_repo);
        assert!(matches!(
            service.delete_task(8).await,
            Err(TaskError::NotFound(8))
        ));
    }
}

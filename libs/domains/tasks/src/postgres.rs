use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::{BaseRepository, Commit, DatabaseError, Page, SortOrder};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, TransactionTrait};
use tracing::instrument;

use crate::{
    entity,
    error::{TaskError, TaskResult},
    filter::TaskFilter,
    lifecycle::{refresh_overdue, refresh_status},
    models::{CreateTask, Task, UpdateTask},
    repository::TaskRepository,
};

#[derive(Clone)]
pub struct PgTaskRepository {
    db: DatabaseConnection,
    base: BaseRepository<entity::Entity>,
    projects: BaseRepository<domain_projects::entity::Entity>,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            base: BaseRepository::new(),
            projects: BaseRepository::new(),
        }
    }

    fn scope(project_id: i32, filter: &TaskFilter) -> Condition {
        Condition::all()
            .add(entity::Column::ProjectId.eq(project_id))
            .add(filter.condition())
    }
}

/// A row that disappears between read and write is reported as missing.
fn missing_as_not_found(id: i32) -> impl FnOnce(DatabaseError) -> TaskError {
    move |err| match err {
        DatabaseError::NotFound(_) => TaskError::NotFound(id),
        other => other.into(),
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    #[instrument(skip(self, input, now))]
    async fn create(
        &self,
        project_id: i32,
        input: CreateTask,
        now: DateTime<Utc>,
    ) -> TaskResult<Task> {
        let row = input.into_active_model(project_id)?;
        let txn = self.db.begin().await?;

        self.projects
            .get_one_by_id(&txn, project_id, Condition::all())
            .await?
            .ok_or(TaskError::ProjectNotFound(project_id))?;

        let model = self.base.create(&txn, row, Commit::Deferred).await?;
        let model = refresh_status(&txn, model, now, Commit::Deferred).await?;

        txn.commit().await?;

        tracing::info!(task_id = model.id, status = %model.status, "Created task");
        Ok(model.into())
    }

    #[instrument(skip(self, now))]
    async fn get_by_id(&self, id: i32, now: DateTime<Utc>) -> TaskResult<Option<Task>> {
        let Some(model) = self
            .base
            .get_one_by_id(&self.db, id, Condition::all())
            .await?
        else {
            return Ok(None);
        };

        let model = refresh_status(&self.db, model, now, Commit::Immediate)
            .await
            .map_err(missing_as_not_found(id))?;
        Ok(Some(model.into()))
    }

    #[instrument(skip(self, now))]
    async fn list(
        &self,
        project_id: i32,
        filter: TaskFilter,
        page: Page,
        order: Option<SortOrder<entity::Column>>,
        now: DateTime<Utc>,
    ) -> TaskResult<Vec<Task>> {
        let txn = self.db.begin().await?;

        refresh_overdue(&txn, Self::scope(project_id, &TaskFilter::default()), now).await?;

        let models = self
            .base
            .get_list(&txn, page, Self::scope(project_id, &filter), order)
            .await?;

        let mut tasks = Vec::with_capacity(models.len());
        for model in models {
            let model = refresh_status(&txn, model, now, Commit::Deferred).await?;
            tasks.push(model.into());
        }

        txn.commit().await?;
        Ok(tasks)
    }

    async fn count(&self, project_id: i32, filter: TaskFilter) -> TaskResult<u64> {
        Ok(self
            .base
            .get_count(&self.db, Self::scope(project_id, &filter))
            .await?)
    }

    #[instrument(skip(self, input, now))]
    async fn update(&self, id: i32, input: UpdateTask, now: DateTime<Utc>) -> TaskResult<Task> {
        let changes = entity::ActiveModel::try_from(input)?;
        let txn = self.db.begin().await?;

        let current = self
            .base
            .get_one_by_id(&txn, id, Condition::all())
            .await?
            .ok_or(TaskError::NotFound(id))?;

        let updated = self
            .base
            .update(&txn, current, changes, Commit::Deferred)
            .await
            .map_err(missing_as_not_found(id))?;
        let updated = refresh_status(&txn, updated, now, Commit::Deferred)
            .await
            .map_err(missing_as_not_found(id))?;

        txn.commit().await?;

        tracing::info!(task_id = id, status = %updated.status, "Updated task");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> TaskResult<Task> {
        let removed = self
            .base
            .remove(&self.db, id, Commit::Immediate)
            .await
            .map_err(missing_as_not_found(id))?;

        tracing::info!(task_id = id, "Deleted task");
        Ok(removed.into())
    }
}

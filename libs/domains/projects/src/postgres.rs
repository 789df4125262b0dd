use async_trait::async_trait;
use database::{BaseRepository, Commit, DatabaseError, Page, SortOrder};
use sea_orm::{Condition, DatabaseConnection, TransactionTrait};
use tracing::instrument;

use crate::{
    entity,
    error::{ProjectError, ProjectResult},
    models::{CreateProject, Project, UpdateProject},
    repository::ProjectRepository,
};

#[derive(Clone)]
pub struct PgProjectRepository {
    db: DatabaseConnection,
    base: BaseRepository<entity::Entity>,
}

impl PgProjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            base: BaseRepository::new(),
        }
    }
}

/// A row that disappears between read and write is reported as missing.
fn missing_as_not_found(id: i32) -> impl FnOnce(DatabaseError) -> ProjectError {
    move |err| match err {
        DatabaseError::NotFound(_) => ProjectError::NotFound(id),
        other => other.into(),
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateProject) -> ProjectResult<Project> {
        let model = self
            .base
            .create(&self.db, input.into(), Commit::Immediate)
            .await?;

        tracing::info!(project_id = model.id, "Created project");
        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> ProjectResult<Option<Project>> {
        let model = self
            .base
            .get_one_by_id(&self.db, id, Condition::all())
            .await?;

        Ok(model.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        page: Page,
        order: Option<SortOrder<entity::Column>>,
    ) -> ProjectResult<Vec<Project>> {
        let models = self
            .base
            .get_list(&self.db, page, Condition::all(), order)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> ProjectResult<u64> {
        Ok(self.base.get_count(&self.db, Condition::all()).await?)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: i32, input: UpdateProject) -> ProjectResult<Project> {
        let txn = self.db.begin().await?;

        let current = self
            .base
            .get_one_by_id(&txn, id, Condition::all())
            .await?
            .ok_or(ProjectError::NotFound(id))?;

        let updated = self
            .base
            .update(&txn, current, input.into(), Commit::Deferred)
            .await
            .map_err(missing_as_not_found(id))?;

        txn.commit().await?;

        tracing::info!(project_id = id, "Updated project");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> ProjectResult<Project> {
        let removed = self
            .base
            .remove(&self.db, id, Commit::Immediate)
            .await
            .map_err(missing_as_not_found(id))?;

        tracing::info!(project_id = id, "Deleted project");
        Ok(removed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn update_of_project_deleted_mid_write_is_not_found() {
        let stamp = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap().into();
        let current = entity::Model {
            id: 5,
            name: "Before".to_string(),
            description: "D".to_string(),
            created_at: stamp,
            updated_at: stamp,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![current], Vec::new()])
            .into_connection();
        let repo = PgProjectRepository::new(db);

        let input = UpdateProject {
            name: Some("After".to_string()),
            ..Default::default()
        };
        let result = repo.update(5, input).await;

        assert!(matches!(result, Err(ProjectError::NotFound(5))));
    }
}

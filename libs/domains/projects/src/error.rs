use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::{DatabaseError, PageError};
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project {0} not found")]
    NotFound(i32),

    #[error("Project conflicts with an existing record: {0}")]
    Conflict(String),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Pagination(#[from] PageError),

    #[error(transparent)]
    Database(DatabaseError),
}

pub type ProjectResult<T> = Result<T, ProjectError>;

impl From<DatabaseError> for ProjectError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(detail) => ProjectError::Conflict(detail),
            other => ProjectError::Database(other),
        }
    }
}

impl From<DbErr> for ProjectError {
    fn from(err: DbErr) -> Self {
        DatabaseError::from(err).into()
    }
}

/// Convert ProjectError to AppError for standardized error responses
impl From<ProjectError> for AppError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::NotFound(id) => AppError::NotFound(format!("Project {} not found", id)),
            ProjectError::Conflict(detail) => {
                tracing::debug!(%detail, "Project write rejected by constraint");
                AppError::Conflict("Project conflicts with existing data".to_string())
            }
            ProjectError::Validation(errors) => AppError::ValidationError(errors),
            ProjectError::Pagination(e) => AppError::InvalidPagination(e.to_string()),
            ProjectError::Database(DatabaseError::Postgres(e)) => AppError::Database(e),
            ProjectError::Database(e) if e.is_unavailable() => {
                AppError::ServiceUnavailable(e.to_string())
            }
            ProjectError::Database(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl IntoResponse for ProjectError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: ProjectError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn maps_domain_errors_to_status_codes() {
        assert_eq!(status_of(ProjectError::NotFound(3)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ProjectError::Conflict("projects_pkey".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(PageError::InvalidWindow.into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn database_conflicts_become_domain_conflicts() {
        let err: ProjectError = DatabaseError::Conflict("projects_pkey".into()).into();
        assert!(matches!(err, ProjectError::Conflict(_)));
    }

    #[test]
    fn connection_failures_are_unavailable() {
        let err: ProjectError = DatabaseError::ConnectionFailed("refused".into()).into();
        assert_eq!(status_of(err), StatusCode::SERVICE_UNAVAILABLE);
    }
}

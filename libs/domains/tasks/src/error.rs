use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::{DatabaseError, PageError};
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task {0} not found")]
    NotFound(i32),

    #[error("Project {0} not found")]
    ProjectNotFound(i32),

    #[error("Invalid due date format: {0}")]
    InvalidDueDate(String),

    #[error("Task conflicts with an existing record: {0}")]
    Conflict(String),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Pagination(#[from] PageError),

    #[error(transparent)]
    Database(DatabaseError),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl From<DatabaseError> for TaskError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(detail) => TaskError::Conflict(detail),
            other => TaskError::Database(other),
        }
    }
}

impl From<DbErr> for TaskError {
    fn from(err: DbErr) -> Self {
        DatabaseError::from(err).into()
    }
}

/// Convert TaskError to AppError for standardized error responses
impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(id) => AppError::NotFound(format!("Task {} not found", id)),
            TaskError::ProjectNotFound(id) => {
                AppError::NotFound(format!("Project {} not found", id))
            }
            TaskError::InvalidDueDate(raw) => {
                AppError::InvalidFilter(format!("Invalid due date format: {}", raw))
            }
            TaskError::Conflict(detail) => {
                tracing::debug!(%detail, "Task write rejected by constraint");
                AppError::Conflict("Task conflicts with existing data".to_string())
            }
            TaskError::Validation(errors) => AppError::ValidationError(errors),
            TaskError::Pagination(e) => AppError::InvalidPagination(e.to_string()),
            TaskError::Database(DatabaseError::Postgres(e)) => AppError::Database(e),
            TaskError::Database(e) if e.is_unavailable() => {
                AppError::ServiceUnavailable(e.to_string())
            }
            TaskError::Database(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

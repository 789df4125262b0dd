pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ConnAcquireErr, DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Task 42 not found",
///   "details": null
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Structured details, e.g. per-field validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn parts(self) -> (StatusCode, ErrorCode, String, Option<Value>) {
        match self {
            AppError::SerdeJson(e) => {
                tracing::error!(error_code = ErrorCode::SerdeJsonError.code(), error = ?e, "JSON serialization failed");
                server_error(ErrorCode::SerdeJsonError)
            }
            AppError::Database(e) => map_db_error(&e),
            AppError::JsonExtractorRejection(e) => {
                (e.status(), ErrorCode::JsonExtraction, e.body_text(), None)
            }
            AppError::QueryExtractorRejection(e) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidQuery,
                e.body_text(),
                None,
            ),
            AppError::ValidationError(e) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::ValidationError,
                ErrorCode::ValidationError.default_message().to_string(),
                Some(validation_details(&e)),
            ),
            AppError::InvalidId(msg) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidId, msg, None),
            AppError::InvalidPagination(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidPagination,
                msg,
                None,
            ),
            AppError::InvalidFilter(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidFilter, msg, None)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::Conflict, msg, None),
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal server error: {}", msg);
                server_error(ErrorCode::InternalError)
            }
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                msg,
                None,
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error_code = code.code(), %message, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error_code = code.code(), %message, "Request rejected");
        }

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

fn server_error(code: ErrorCode) -> (StatusCode, ErrorCode, String, Option<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        code,
        code.default_message().to_string(),
        None,
    )
}

/// Maps a SeaORM error to response parts. Driver messages are logged, never returned.
fn map_db_error(error: &DbErr) -> (StatusCode, ErrorCode, String, Option<Value>) {
    if let Some(SqlErr::UniqueConstraintViolation(detail))
    | Some(SqlErr::ForeignKeyConstraintViolation(detail)) = error.sql_err()
    {
        tracing::info!(error_code = ErrorCode::Conflict.code(), %detail, "Constraint violation");
        return (
            StatusCode::CONFLICT,
            ErrorCode::Conflict,
            ErrorCode::Conflict.default_message().to_string(),
            None,
        );
    }

    let (status, code) = match error {
        DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::DatabaseNotFound),
        DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabasePoolTimeout,
        ),
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseConnection,
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError),
    };

    if status.is_server_error() {
        tracing::error!(error_code = code.code(), error = ?error, "Database error");
    }

    (status, code, code.default_message().to_string(), None)
}

/// Per-field validation errors as `{ field: [{code, message, params}] }`.
pub fn validation_details(errors: &ValidationErrors) -> Value {
    let fields = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let entries: Vec<Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), Value::Array(entries))
        })
        .collect::<serde_json::Map<_, _>>();

    Value::Object(fields)
}

/// Builds an error response for handlers that do not go through [`AppError`].
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Named {
        #[validate(length(min = 1, max = 64))]
        name: String,
    }

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_keeps_message() {
        let response = AppError::NotFound("Task 42 not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_of(response).await;
        assert_eq!(body.code, 1004);
        assert_eq!(body.error, "NOT_FOUND");
        assert_eq!(body.message, "Task 42 not found");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = AppError::InternalServerError("pool exploded".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.error, "INTERNAL_ERROR");
        assert!(!body.message.contains("pool exploded"));
    }

    #[tokio::test]
    async fn validation_errors_list_fields() {
        let errors = Named {
            name: String::new(),
        }
        .validate()
        .unwrap_err();

        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body.error, "VALIDATION_ERROR");
        let details = body.details.unwrap();
        assert_eq!(details["name"][0]["code"], "length");
    }

    #[tokio::test]
    async fn pagination_and_filter_errors_are_bad_requests() {
        let response = AppError::InvalidPagination("Invalid pagination parameters".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await.error, "INVALID_PAGINATION");

        let response = AppError::InvalidFilter("Invalid due date format".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await.code, 1014);
    }

    #[test]
    fn db_connection_errors_are_unavailable() {
        let (status, code, _, _) = map_db_error(&DbErr::Conn(sea_orm::RuntimeErr::Internal(
            "refused".into(),
        )));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, ErrorCode::DatabaseConnection);

        let (status, code, _, _) = map_db_error(&DbErr::ConnectionAcquire(ConnAcquireErr::Timeout));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, ErrorCode::DatabasePoolTimeout);
    }

    #[test]
    fn db_record_not_found_is_404() {
        let (status, code, _, _) = map_db_error(&DbErr::RecordNotFound("tasks".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, ErrorCode::DatabaseNotFound);
    }

    #[test]
    fn other_db_errors_are_500() {
        let (status, code, message, _) = map_db_error(&DbErr::Custom("secret detail".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, ErrorCode::DatabaseError);
        assert!(!message.contains("secret"));
    }
}

//! Success response helpers shared by domain handlers.

use axum::{
    Json,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Header carrying the unpaginated row count of a list response.
pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// Confirmation body for deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DetailResponse {
    #[schema(example = "Task deleted")]
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl IntoResponse for DetailResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// JSON array body with an `X-Total-Count` header.
pub fn paginated<T: Serialize>(items: Vec<T>, total: u64) -> Response {
    (
        [(TOTAL_COUNT_HEADER, HeaderValue::from(total))],
        Json(items),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn paginated_sets_total_count_header() {
        let response = paginated(vec![1, 2], 17);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[TOTAL_COUNT_HEADER], "17");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"[1,2]");
    }

    #[tokio::test]
    async fn detail_response_body() {
        let response = DetailResponse::new("Project deleted").into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: DetailResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.detail, "Project deleted");
    }
}

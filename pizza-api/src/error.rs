use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use diesel::result::DatabaseErrorKind;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::validation::PriceOutOfRange;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("Database error: {0}")]
    Database(diesel::result::Error),
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn restaurant_not_found() -> Self {
        ApiError::NotFound("Restaurant not found".to_string())
    }

    pub fn invalid_references() -> Self {
        ApiError::Validation(vec!["Invalid pizza_id or restaurant_id".to_string()])
    }
}

impl From<PriceOutOfRange> for ApiError {
    fn from(e: PriceOutOfRange) -> Self {
        ApiError::Validation(vec![e.to_string()])
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            // The only CHECK constraint in the schema is the price range.
            diesel::result::Error::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
                PriceOutOfRange.into()
            }
            e => ApiError::Database(e),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiValidationErrorResponse {
    /// Validation failures, in the order they were detected
    pub errors: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(error) => {
                (StatusCode::NOT_FOUND, Json(ApiErrorResponse { error })).into_response()
            }
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ApiValidationErrorResponse { errors }),
            )
                .into_response(),
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                internal_server_error()
            }
            ApiError::InternalError(msg) => {
                error!(error = %msg, "internal error");
                internal_server_error()
            }
        }
    }
}

fn internal_server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiErrorResponse {
            error: "Internal server error".to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_uses_singular_error_key() {
        let (status, body) = body_json(ApiError::restaurant_not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"error": "Restaurant not found"}));
    }

    #[tokio::test]
    async fn validation_uses_errors_array() {
        let (status, body) = body_json(ApiError::invalid_references()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({"errors": ["Invalid pizza_id or restaurant_id"]})
        );
    }

    #[tokio::test]
    async fn database_errors_are_not_leaked() {
        let (status, body) = body_json(diesel::result::Error::NotFound.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "Internal server error"}));
    }

    #[test]
    fn check_violation_maps_to_price_error() {
        let e = diesel::result::Error::DatabaseError(
            DatabaseErrorKind::CheckViolation,
            Box::new("CHECK constraint failed: price BETWEEN 1 AND 30".to_string()),
        );
        match ApiError::from(e) {
            ApiError::Validation(errors) => {
                assert_eq!(errors, vec!["Price must be between 1 and 30".to_string()])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

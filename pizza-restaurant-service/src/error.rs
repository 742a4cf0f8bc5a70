use axum::{http::StatusCode, response::Json};
use serde::Serialize;
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(entity) => ApiError::NotFound(entity),
            StoreError::InvalidReference | StoreError::Validation(_) => {
                ApiError::Validation(vec![e.to_string()])
            }
            _ => ApiError::InternalError(e.to_string()),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(entity) => {
                let body = Json(json!({ "error": format!("{entity} not found") }));
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Validation(errors) => {
                let body = Json(json!({ "errors": errors }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::InternalError(msg) => {
                error!(%msg, "request failed");
                let body = Json(json!({ "error": "Internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
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
    /// Every problem found with the request
    pub errors: Vec<String>,
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use beacon_db::StoreError;
use serde_json::json;
use tracing::error;

/// Request-scoped failure taxonomy. Gate outcomes (`Unauthenticated`,
/// `Unauthorized`) are normal control flow, not faults; each carries the
/// login entry point the caller should be sent to.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    DuplicateEmail,
    InvalidCredentials,
    Unauthenticated,
    Unauthorized,
    NotFound,
    InvalidTransition(String),
    Internal,
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(msg) => ApiError::Validation(msg),
            StoreError::DuplicateEmail => ApiError::DuplicateEmail,
            StoreError::NotFound => ApiError::NotFound,
            StoreError::InvalidTransition { from, action } => {
                ApiError::InvalidTransition(format!("report is {from}, cannot {action} it"))
            }
            StoreError::Database(err) => {
                error!("database error: {}", err);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::DuplicateEmail => (
                StatusCode::CONFLICT,
                json!({ "error": "email already registered" }),
            ),
            // Deliberately generic: do not reveal whether the account exists.
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "invalid email or password" }),
            ),
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "login required", "login": "/auth/login" }),
            ),
            ApiError::Unauthorized => (
                StatusCode::FORBIDDEN,
                json!({ "error": "admin access required", "login": "/auth/admin/login" }),
            ),
            ApiError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "not found" })),
            ApiError::InvalidTransition(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "internal server error" }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

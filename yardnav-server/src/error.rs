use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tower::BoxError;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A pickup or drop lot is missing or unknown
    #[error("selection invalid")]
    SelectionInvalid,
    #[error("route not available")]
    RouteNotAvailable,
    #[error("{0}")]
    BadRequest(String),
    #[error("request timed out")]
    Timeout,
    #[error(transparent)]
    Core(#[from] yardnav_core::Error),
    #[error("Failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::SelectionInvalid | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotAvailable => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Core(_)
            | ApiError::Serialization(_)
            | ApiError::Task(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Maps failures of the tower middleware stack onto API errors
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(format!("Unhandled middleware error: {err}"))
    }
}

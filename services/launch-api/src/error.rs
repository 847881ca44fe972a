use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use launchpad_launches::LaunchError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by request handlers, rendered as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required launch property")]
    MissingProperty,

    #[error("Invalid launch date")]
    InvalidLaunchDate,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Launch not found")]
    LaunchNotFound,

    #[error("Launch not aborted!")]
    NotAborted,

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::LaunchNotFound => StatusCode::NOT_FOUND,
            ApiError::Launch(LaunchError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::errors::{find_stats_error, StatsError};

/// Any failure surfaced by a handler.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(StatsError::InvalidInput(message.into()).into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match find_stats_error(&self.0) {
            Some(err @ StatsError::NotFound { .. }) => (StatusCode::NOT_FOUND, err.to_string()),
            Some(err @ StatsError::DuplicatePerformance { .. }) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            Some(err @ StatsError::InvalidInput(_)) => (StatusCode::BAD_REQUEST, err.to_string()),
            _ => {
                log::error!("Request failed: {:#}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

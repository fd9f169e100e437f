//! Mapping of agent errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use outpost_api::ErrorResponse;

use crate::errors::AgentError;

/// An [`AgentError`] returned from a handler
#[derive(Debug)]
pub struct ApiError(pub AgentError);

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            AgentError::NotFound(_) => StatusCode::NOT_FOUND,
            AgentError::ValidationError(_) | AgentError::JsonError(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AgentError::AdapterError(_) | AgentError::HttpError(_) => StatusCode::BAD_GATEWAY,
            AgentError::IoError(_)
            | AgentError::DatabaseError(_)
            | AgentError::ServerError(_)
            | AgentError::ConfigError(_)
            | AgentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

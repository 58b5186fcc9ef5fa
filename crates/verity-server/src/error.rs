//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use verity_runtime::PipelineError;

/// Errors returned by API handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejected before the pipeline runs
    #[error("{0}")]
    InvalidInput(String),

    /// The pipeline ran and failed
    #[error("Workflow execution failed: {0}")]
    PipelineFailure(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        if err.is_invalid_input() {
            ApiError::InvalidInput(err.to_string())
        } else {
            ApiError::PipelineFailure(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::PipelineFailure(_) => {
                error!(error = %self, "Pipeline failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

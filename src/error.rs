//! Error handling module
//!
//! Provides unified error types and handling for the entire application.

use crate::workflow::WorkflowError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String, Option<String>) {
        match self {
            AppError::Workflow(e) => {
                let (status, code) = match e {
                    WorkflowError::UnknownScheme(_) => (StatusCode::NOT_FOUND, "UNKNOWN_SCHEME"),
                    WorkflowError::ProposalNotFound(_) => (StatusCode::NOT_FOUND, "PROPOSAL_NOT_FOUND"),
                    WorkflowError::StageNotFound { .. } => (StatusCode::NOT_FOUND, "STAGE_NOT_FOUND"),
                    WorkflowError::InvalidTransition(_) => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
                    WorkflowError::UnknownParent { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_PARENT"),
                    WorkflowError::InvalidScheme(_) => {
                        error!("Scheme catalog error: {}", e);
                        (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_SCHEME")
                    }
                };
                (status, code, e.to_string(), None)
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                None,
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = self.parts();

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: details,
            code: Some(error_code.to_string()),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

/// Helper function to create a not found error
pub fn not_found_error(msg: impl Into<String>) -> AppError {
    AppError::NotFound(msg.into())
}

//! Error handling for the Pointcast panel service
//!
//! Provides consistent JSON error responses and a structured
//! classification of upstream provider failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Classification of an upstream provider failure
///
/// The provider client inspects the upstream response once and maps it
/// here; nothing above the client matches on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// A requested parameter cannot be combined with the others at the
    /// requested instant (the retryable air-quality signature)
    ParameterUnavailable,
    /// Any other upstream failure; fatal for the request
    Upstream,
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    // Upstream provider errors
    #[error("Provider error ({status}): {message}")]
    Provider {
        status: u16,
        message: String,
        kind: ProviderErrorKind,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this is the one retryable provider signature
    pub fn is_parameter_unavailable(&self) -> bool {
        matches!(
            self,
            AppError::Provider {
                kind: ProviderErrorKind::ParameterUnavailable,
                ..
            }
        )
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "BAD_REQUEST".to_string(),
                    message: message.clone(),
                    field: None,
                },
            ),
            AppError::Provider {
                status, message, ..
            } => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "PROVIDER_ERROR".to_string(),
                    message: format!("Weather provider error ({}): {}", status, message),
                    field: None,
                },
            ),
            AppError::Configuration(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", message),
                    field: None,
                },
            ),
            AppError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: message.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;

//! Error types for WikiCheck
//!
//! Provides a single error enum for the whole pipeline with:
//! - Distinct variants for retrieval, analyzer, and I/O failure modes
//! - A retryability flag for terminal retrieval failures
//! - HTTP status code mapping and structured error responses
//! - Error codes for client handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,

    // Retrieval errors (2xxx)
    RetrievalRateLimited,
    RetrievalTimeout,
    RetrievalTransient,

    // Analyzer errors (3xxx)
    AnalyzerUnavailable,
    MalformedAnalyzerResponse,

    // Storage errors (4xxx)
    ExportError,
    HistoryError,

    // Internal errors (9xxx)
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,

            ErrorCode::RetrievalRateLimited => 2001,
            ErrorCode::RetrievalTimeout => 2002,
            ErrorCode::RetrievalTransient => 2003,

            ErrorCode::AnalyzerUnavailable => 3001,
            ErrorCode::MalformedAnalyzerResponse => 3002,

            ErrorCode::ExportError => 4001,
            ErrorCode::HistoryError => 4002,

            ErrorCode::ConfigurationError => 9001,
            ErrorCode::SerializationError => 9002,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    // Retrieval errors
    #[error("Rate limit exceeded by knowledge source")]
    RetrievalRateLimited,

    #[error("Knowledge source request timed out")]
    RetrievalTimeout,

    #[error("Knowledge source request failed: {message}")]
    RetrievalTransient { message: String },

    // Analyzer errors
    #[error("Analyzer unavailable: {message}")]
    AnalyzerUnavailable { message: String },

    #[error("Malformed analyzer response: {message}")]
    MalformedAnalyzerResponse { message: String },

    // Storage errors
    #[error("Export failed: {message}")]
    Export { message: String },

    #[error("History store error: {message}")]
    History { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::RetrievalRateLimited => ErrorCode::RetrievalRateLimited,
            AppError::RetrievalTimeout => ErrorCode::RetrievalTimeout,
            AppError::RetrievalTransient { .. } => ErrorCode::RetrievalTransient,
            AppError::AnalyzerUnavailable { .. } => ErrorCode::AnalyzerUnavailable,
            AppError::MalformedAnalyzerResponse { .. } => ErrorCode::MalformedAnalyzerResponse,
            AppError::Export { .. } => ErrorCode::ExportError,
            AppError::History { .. } => ErrorCode::HistoryError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,

            // 429 Too Many Requests
            AppError::RetrievalRateLimited => StatusCode::TOO_MANY_REQUESTS,

            // 504 Gateway Timeout
            AppError::RetrievalTimeout => StatusCode::GATEWAY_TIMEOUT,

            // 502 Bad Gateway
            AppError::RetrievalTransient { .. }
            | AppError::AnalyzerUnavailable { .. }
            | AppError::MalformedAnalyzerResponse { .. } => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            AppError::Export { .. }
            | AppError::History { .. }
            | AppError::Configuration { .. }
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Terminal retrieval failures that the caller should retry with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::RetrievalRateLimited | AppError::RetrievalTimeout)
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    pub retryable: bool,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        if self.is_server_error() {
            tracing::error!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message,
                retryable: self.is_retryable(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

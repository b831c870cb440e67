//! Unified API error handling
//!
//! This module provides a consistent error response format across all API endpoints.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::service::analysis::AnalysisError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent error handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// External service error (502)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// The grading service answered with an unusable reply (502)
    #[error("Malformed upstream reply: {0}")]
    MalformedUpstreamReply(String),
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal_error",
            ApiError::ExternalService(_) => "external_service_error",
            ApiError::MalformedUpstreamReply(_) => "malformed_upstream_reply",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ExternalService(_) | ApiError::MalformedUpstreamReply(_) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = self.error_type();

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::EmptyStory => ApiError::BadRequest(err.to_string()),
            AnalysisError::RemoteCall(msg) => ApiError::ExternalService(msg),
            e if e.is_malformed_reply() => ApiError::MalformedUpstreamReply(e.to_string()),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_errors_map_to_status() {
        let cases = [
            (AnalysisError::EmptyStory, StatusCode::BAD_REQUEST),
            (
                AnalysisError::RemoteCall("401 Unauthorized".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (AnalysisError::EmptyReply, StatusCode::BAD_GATEWAY),
            (
                AnalysisError::SegmentationMismatch { offset: 3 },
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_malformed_reply_is_distinguishable() {
        let err = ApiError::from(AnalysisError::MalformedReply(vec![
            "revisedText: missing required field".to_string(),
        ]));
        assert_eq!(err.error_type(), "malformed_upstream_reply");
        assert!(err.to_string().contains("revisedText"));

        let err = ApiError::from(AnalysisError::RemoteCall("timeout".to_string()));
        assert_eq!(err.error_type(), "external_service_error");
    }
}

//! JSON error boundary
//!
//! Every handler failure is converted to a `{success: false, error}` payload
//! here; nothing propagates as an unhandled fault. Status codes follow the
//! failure taxonomy: 400 bad input, 401 unauthenticated, 404 missing row,
//! 429 upstream quota, 500 everything else.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use pv_types::AppError;

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiErrorResponse>;

#[derive(Debug)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub message: String,
}

impl ApiErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<AppError> for ApiErrorResponse {
    fn from(err: AppError) -> Self {
        let status = match &err {
            AppError::InvalidParams(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            // Includes Config: a missing credential is a server-side 500 with
            // a distinct message, never retried.
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.message,
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (AppError::InvalidParams("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::RateLimitExceeded, StatusCode::TOO_MANY_REQUESTS),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                AppError::Config("missing key".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::AuditTimeout,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Storage("disk full".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let response: ApiErrorResponse = err.into();
            assert_eq!(response.status, expected);
        }
    }
}

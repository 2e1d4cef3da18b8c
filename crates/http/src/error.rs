//! HTTP error envelope for the bookstore service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Failures surfaced to HTTP clients. Every variant renders as
/// `{"error": {code, message, details, trace_id, timestamp}}`.
#[derive(Error, Debug)]
pub enum AppError {
    /// 400: the request body failed schema validation.
    #[error("validation error: {message}")]
    Validation {
        details: Vec<serde_json::Value>,
        code: String,
        message: String,
    },

    /// 409: a write collided with an existing record.
    #[error("conflict: {message}")]
    Conflict {
        details: Vec<serde_json::Value>,
        code: String,
        message: String,
    },

    /// 404: the addressed record does not exist.
    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    /// 500: anything unexpected, store connectivity included.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            code: "validation_error".to_string(),
            message: message.into(),
        }
    }

    pub fn conflict(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Conflict {
            details,
            code: "conflict".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    fn into_parts(self) -> (StatusCode, String, String, Vec<serde_json::Value>) {
        match self {
            AppError::Validation {
                details,
                code,
                message,
            } => (StatusCode::BAD_REQUEST, code, message, details),
            AppError::Conflict {
                details,
                code,
                message,
            } => (StatusCode::CONFLICT, code, message, details),
            AppError::NotFound { message, code } => {
                (StatusCode::NOT_FOUND, code, message, Vec::new())
            }
            AppError::Internal(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error".to_string(),
                error.to_string(),
                Vec::new(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let trace_id = Uuid::new_v4();
        let (status, code, message, details) = self.into_parts();

        tracing::error!(
            trace_id = %trace_id,
            code = %code,
            status = status.as_u16(),
            "request failed"
        );

        // Internal error text is not shown outside debug builds.
        let message =
            if status == StatusCode::INTERNAL_SERVER_ERROR && cfg!(not(debug_assertions)) {
                "An internal server error occurred".to_string()
            } else {
                message
            };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
                "details": details,
                "trace_id": trace_id.to_string(),
                "timestamp": OffsetDateTime::now_utc().to_string(),
            }
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_carries_details_and_code() {
        let details = vec![serde_json::json!({"field": "isbn", "error": "required"})];
        let error = AppError::validation(details.clone(), "Validation failed");

        match error {
            AppError::Validation {
                details: d,
                code,
                message,
            } => {
                assert_eq!(d, details);
                assert_eq!(code, "validation_error");
                assert_eq!(message, "Validation failed");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let details = vec![serde_json::json!({"field": "pages", "error": "required"})];
        let response = AppError::validation(details, "Validation failed").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_maps_to_409() {
        let response = AppError::conflict(vec![], "Duplicate key").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::not_found("Resource not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_maps_to_500() {
        let error = AppError::Internal(anyhow::anyhow!("Database connection failed"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! Error types for web handlers.
//!
//! [`AppError`] bridges lifecycle errors and HTTP responses. Every
//! [`SupportError`] variant maps to exactly one status code here; the core
//! crate never sees HTTP.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use support_desk_core::SupportError;

/// A single field that failed request validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON field name
    pub field: &'static str,
    /// What is wrong with it
    pub message: String,
}

impl FieldError {
    /// Create a field error
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(TicketIdPath(id): TicketIdPath) -> Result<Json<TicketResponse>, AppError> {
///     let ticket = state.service.get_by_id(id)?; // SupportError -> AppError
///     Ok(Json(ticket.into()))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: &'static str,
    /// Per-field validation failures
    errors: Vec<FieldError>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            status,
            message: message.into(),
            code,
            errors: Vec::new(),
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// Create a 400 error listing every field that failed validation.
    #[must_use]
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            errors,
            ..Self::new(
                StatusCode::BAD_REQUEST,
                "one or more fields are invalid",
                "VALIDATION_ERROR",
            )
        }
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, "NOT_FOUND")
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            "INTERNAL_SERVER_ERROR",
        )
    }

    /// HTTP status this error renders as
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Field validation failures, empty for other errors
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        &self.errors
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
///
/// Also stored in the response extensions, so outer layers can rewrite the
/// body without parsing it.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// When the error was rendered
    pub timestamp: DateTime<Utc>,
    /// Numeric HTTP status
    pub status: u16,
    /// Reason phrase for `status`
    pub error: &'static str,
    /// Error code (for client error handling).
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Request path, filled in by the error path layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Field validation failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    /// Set the request path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            timestamp: Utc::now(),
            status: self.status.as_u16(),
            error: self.status.canonical_reason().unwrap_or("Unknown"),
            code: self.code,
            message: self.message,
            path: None,
            errors: self.errors,
        };

        let mut response = (self.status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

impl From<SupportError> for AppError {
    fn from(err: SupportError) -> Self {
        let (status, code) = match &err {
            SupportError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            SupportError::BusinessRuleViolation { .. } => {
                (StatusCode::BAD_REQUEST, "BUSINESS_RULE_VIOLATION")
            }
            SupportError::InvalidTransition { .. } => {
                (StatusCode::BAD_REQUEST, "INVALID_TRANSITION")
            }
        };
        Self::new(status, err.to_string(), code)
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("an unexpected error occurred, please try again later").with_source(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use support_desk_core::{TicketId, TicketStatus};

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::from(SupportError::NotFound {
            id: TicketId::new(999),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.to_string(),
            "[NOT_FOUND] support ticket not found with id: 999"
        );
    }

    #[test]
    fn test_rule_errors_map_to_400() {
        let rule = AppError::from(SupportError::business_rule("cannot update a closed ticket"));
        assert_eq!(rule.status(), StatusCode::BAD_REQUEST);
        assert_eq!(rule.code(), "BUSINESS_RULE_VIOLATION");

        let transition = AppError::from(SupportError::InvalidTransition {
            from: TicketStatus::Closed,
            to: TicketStatus::Open,
        });
        assert_eq!(transition.status(), StatusCode::BAD_REQUEST);
        assert_eq!(transition.code(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_validation_carries_fields() {
        let err = AppError::validation(vec![FieldError::new("title", "title is required")]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.field_errors().len(), 1);
    }

    #[test]
    fn test_response_carries_error_body() {
        let response = AppError::not_found("support ticket not found with id: 3").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.extensions().get::<ErrorResponse>().unwrap();
        assert_eq!(body.status, 404);
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.code, "NOT_FOUND");
        assert!(body.path.is_none());
        assert!(body.timestamp <= Utc::now());
    }

    #[test]
    fn test_anyhow_is_internal() {
        let err = AppError::from(anyhow::anyhow!("lock exploded"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(std::error::Error::source(&err).is_some());
    }
}

//! Custom Axum extractors.
//!
//! Every extractor here rejects with [`AppError`], so malformed bodies and
//! path parameters render the same JSON error shape as business rule
//! failures:
//! - `JsonBody`: JSON request body, 400 `BAD_REQUEST` when it does not parse
//! - `TicketIdPath`: `:id` path segment as a [`TicketId`]
//! - `StatusPath`: `:status` path segment as a [`TicketStatus`] wire code
//! - `CorrelationId`: the id assigned by the correlation middleware
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(
//!     State(state): State<AppState>,
//!     TicketIdPath(id): TicketIdPath,
//!     JsonBody(request): JsonBody<ChangeStatusRequest>,
//! ) -> Result<Json<TicketResponse>, AppError> {
//!     let status = request.validate()?;
//!     Ok(Json(state.service.change_status(id, status)?.into()))
//! }
//! ```

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use support_desk_core::{TicketId, TicketStatus};
use uuid::Uuid;

/// JSON request body.
///
/// Same as [`Json`], but a body that is missing, not JSON, or the wrong
/// shape (including unknown enum codes) becomes a 400 `BAD_REQUEST`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError::bad_request(format!("malformed request body: {}", rejection.body_text()))
        })?;
        Ok(Self(value))
    }
}

/// Ticket id from the `:id` path segment.
#[derive(Debug, Clone, Copy)]
pub struct TicketIdPath(pub TicketId);

#[async_trait]
impl<S> FromRequestParts<S> for TicketIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<u64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request(format!("invalid ticket id: {}", rejection.body_text()))
            })?;
        Ok(Self(TicketId::new(id)))
    }
}

/// Status from the `:status` path segment (`OPEN`, `IN_PROGRESS`, ...).
#[derive(Debug, Clone, Copy)]
pub struct StatusPath(pub TicketStatus);

#[async_trait]
impl<S> FromRequestParts<S> for StatusPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(code) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        let status = code
            .parse::<TicketStatus>()
            .map_err(|err| AppError::bad_request(err.to_string()))?;
        Ok(Self(status))
    }
}

/// Correlation ID for request tracing.
///
/// Reads the id stored by [`correlation_id_layer`](crate::middleware::correlation_id_layer).
/// Without the middleware it falls back to the `X-Correlation-ID` header,
/// then to a fresh UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(*id);
        }

        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    async fn status_of(app: Router, uri: &str) -> StatusCode {
        let request = axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_ticket_id_path() {
        let app = Router::new().route(
            "/:id",
            get(|TicketIdPath(id): TicketIdPath| async move { id.to_string() }),
        );

        assert_eq!(status_of(app.clone(), "/42").await, StatusCode::OK);
        assert_eq!(status_of(app.clone(), "/abc").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_of(app, "/-1").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_status_path() {
        let app = Router::new().route(
            "/:status",
            get(|StatusPath(status): StatusPath| async move { status.to_string() }),
        );

        assert_eq!(status_of(app.clone(), "/IN_PROGRESS").await, StatusCode::OK);
        assert_eq!(status_of(app.clone(), "/in_progress").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_of(app, "/ARCHIVED").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_correlation_id_from_header() {
        let uuid = Uuid::new_v4();
        let req = axum::http::Request::builder()
            .header(CORRELATION_ID_HEADER, uuid.to_string())
            .body(())
            .expect("Valid request");

        let (mut parts, ()) = req.into_parts();
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, uuid);
    }

    #[tokio::test]
    async fn test_correlation_id_prefers_extension() {
        let stored = CorrelationId(Uuid::new_v4());
        let mut req = axum::http::Request::builder()
            .header(CORRELATION_ID_HEADER, Uuid::new_v4().to_string())
            .body(())
            .expect("Valid request");
        req.extensions_mut().insert(stored);

        let (mut parts, ()) = req.into_parts();
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id, stored);
    }
}

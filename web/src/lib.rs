//! Axum HTTP surface for the support desk.
//!
//! The web crate is a thin shell around [`support_desk_core::TicketService`]:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         HTTP Shell (Axum)               │  ← JSON, path parsing
//! │  - Field validation (dto)               │  ← 400 VALIDATION_ERROR
//! │  - Error mapping (AppError)             │  ← 404 / 400 / 500
//! ├─────────────────────────────────────────┤
//! │         Lifecycle Engine (core)         │
//! │  - Transition table                     │  ← No HTTP types
//! │  - Business rules                       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives, gets a correlation id and a trace span
//! 2. **Extract** body and path parameters (malformed input is a 400)
//! 3. **Validate** the DTO, collecting every field error
//! 4. **Call** one `TicketService` operation
//! 5. **Map** the ticket or `SupportError` to a response
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use support_desk_core::{environment::SystemClock, TicketService, TicketStore};
//! use support_desk_web::{build_router, AppState};
//!
//! let service = TicketService::new(Arc::new(TicketStore::new()), Arc::new(SystemClock));
//! let app: axum::Router = build_router(AppState::new(Arc::new(service)));
//! # drop(app);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use error::{AppError, ErrorResponse, FieldError};
pub use extractors::{CorrelationId, JsonBody, StatusPath, TicketIdPath};
pub use middleware::{correlation_id_layer, error_path_layer, CORRELATION_ID_HEADER};
pub use routes::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;

//! Ticket endpoints under `/api/tickets`.
//!
//! Handlers validate the request shape, call one [`TicketService`]
//! operation and map the result. Business rules live in the service.
//!
//! [`TicketService`]: support_desk_core::TicketService

use crate::dto::{
    ChangeStatusRequest, CreateTicketRequest, StatisticsResponse, TicketResponse,
    UpdateTicketRequest,
};
use crate::WebResult;
use crate::extractors::{JsonBody, StatusPath, TicketIdPath};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

fn responses(tickets: Vec<support_desk_core::Ticket>) -> Json<Vec<TicketResponse>> {
    Json(tickets.into_iter().map(TicketResponse::from).collect())
}

/// `POST /api/tickets`
///
/// # Errors
///
/// 400 `VALIDATION_ERROR` or `BAD_REQUEST` for an invalid body.
#[allow(clippy::unused_async)]
pub async fn create_ticket(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateTicketRequest>,
) -> WebResult<(StatusCode, Json<TicketResponse>)> {
    let new = request.validate()?;
    let ticket = state
        .service
        .create(new.title, new.description, new.priority);
    Ok((StatusCode::CREATED, Json(ticket.into())))
}

/// `GET /api/tickets`
#[allow(clippy::unused_async)]
pub async fn list_tickets(State(state): State<AppState>) -> Json<Vec<TicketResponse>> {
    responses(state.service.list_all())
}

/// `GET /api/tickets/:id`
///
/// # Errors
///
/// 404 `NOT_FOUND` for an unknown id.
#[allow(clippy::unused_async)]
pub async fn get_ticket(
    State(state): State<AppState>,
    TicketIdPath(id): TicketIdPath,
) -> WebResult<Json<TicketResponse>> {
    Ok(Json(state.service.get_by_id(id)?.into()))
}

/// `GET /api/tickets/status/:status`
#[allow(clippy::unused_async)]
pub async fn list_by_status(
    State(state): State<AppState>,
    StatusPath(status): StatusPath,
) -> Json<Vec<TicketResponse>> {
    responses(state.service.list_by_status(status))
}

/// `PUT /api/tickets/:id`
///
/// # Errors
///
/// 404 for an unknown id, 400 for a closed ticket or an invalid body.
#[allow(clippy::unused_async)]
pub async fn update_ticket(
    State(state): State<AppState>,
    TicketIdPath(id): TicketIdPath,
    JsonBody(request): JsonBody<UpdateTicketRequest>,
) -> WebResult<Json<TicketResponse>> {
    let update = request.validate()?;
    Ok(Json(state.service.update_fields(id, update)?.into()))
}

/// `PATCH /api/tickets/:id/status`
///
/// # Errors
///
/// 404 for an unknown id, 400 `INVALID_TRANSITION` for a move the table
/// does not allow.
#[allow(clippy::unused_async)]
pub async fn change_status(
    State(state): State<AppState>,
    TicketIdPath(id): TicketIdPath,
    JsonBody(request): JsonBody<ChangeStatusRequest>,
) -> WebResult<Json<TicketResponse>> {
    let status = request.validate()?;
    Ok(Json(state.service.change_status(id, status)?.into()))
}

/// `PATCH /api/tickets/:id/close`
///
/// # Errors
///
/// 404 for an unknown id, 400 unless the ticket is `RESOLVED`.
#[allow(clippy::unused_async)]
pub async fn close_ticket(
    State(state): State<AppState>,
    TicketIdPath(id): TicketIdPath,
) -> WebResult<Json<TicketResponse>> {
    Ok(Json(state.service.close(id)?.into()))
}

/// `DELETE /api/tickets/:id`
///
/// # Errors
///
/// 404 for an unknown id, 400 unless the ticket is `OPEN`.
#[allow(clippy::unused_async)]
pub async fn delete_ticket(
    State(state): State<AppState>,
    TicketIdPath(id): TicketIdPath,
) -> WebResult<StatusCode> {
    state.service.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/tickets/statistics`
#[allow(clippy::unused_async)]
pub async fn statistics(State(state): State<AppState>) -> Json<StatisticsResponse> {
    Json(state.service.statistics())
}

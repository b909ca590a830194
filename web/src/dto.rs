//! Request and response bodies.
//!
//! Requests deserialize every field as optional so a missing field becomes
//! a field error instead of a parse failure. `validate` collects all field
//! errors before rejecting.

use crate::error::{AppError, FieldError};
use serde::{Deserialize, Serialize};
use support_desk_core::{
    DateTime, Priority, Ticket, TicketId, TicketStatistics, TicketStatus, TicketUpdate, Utc,
};

/// Title length bounds, in characters
pub const TITLE_LENGTH: (usize, usize) = (5, 100);

/// Description length bounds, in characters
pub const DESCRIPTION_LENGTH: (usize, usize) = (10, 500);

/// Body of `POST /api/tickets`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    /// Short summary
    pub title: Option<String>,
    /// Full problem description
    pub description: Option<String>,
    /// Priority code
    pub priority: Option<Priority>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    /// Short summary
    pub title: String,
    /// Full problem description
    pub description: String,
    /// Priority
    pub priority: Priority,
}

impl CreateTicketRequest {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// `VALIDATION_ERROR` listing each missing, blank, or out-of-bounds field.
    pub fn validate(self) -> Result<NewTicket, AppError> {
        let mut errors = Vec::new();
        let title = required_text(&mut errors, "title", self.title, TITLE_LENGTH);
        let description =
            required_text(&mut errors, "description", self.description, DESCRIPTION_LENGTH);
        if self.priority.is_none() {
            errors.push(FieldError::new("priority", "priority is required"));
        }

        match (title, description, self.priority) {
            (Some(title), Some(description), Some(priority)) if errors.is_empty() => {
                Ok(NewTicket {
                    title,
                    description,
                    priority,
                })
            }
            _ => Err(AppError::validation(errors)),
        }
    }
}

/// Body of `PUT /api/tickets/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New priority
    pub priority: Option<Priority>,
}

impl UpdateTicketRequest {
    /// Check the fields that are present.
    ///
    /// Blank text within the length bounds passes here; the lifecycle
    /// engine ignores it.
    ///
    /// # Errors
    ///
    /// `VALIDATION_ERROR` if a present text field is out of bounds.
    pub fn validate(self) -> Result<TicketUpdate, AppError> {
        let mut errors = Vec::new();
        if let Some(title) = &self.title {
            check_length(&mut errors, "title", title, TITLE_LENGTH);
        }
        if let Some(description) = &self.description {
            check_length(&mut errors, "description", description, DESCRIPTION_LENGTH);
        }
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        Ok(TicketUpdate {
            title: self.title,
            description: self.description,
            priority: self.priority,
        })
    }
}

/// Body of `PATCH /api/tickets/:id/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeStatusRequest {
    /// Requested status code
    pub status: Option<TicketStatus>,
}

impl ChangeStatusRequest {
    /// # Errors
    ///
    /// `VALIDATION_ERROR` if `status` is missing.
    pub fn validate(self) -> Result<TicketStatus, AppError> {
        self.status.ok_or_else(|| {
            AppError::validation(vec![FieldError::new("status", "status is required")])
        })
    }
}

fn required_text(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Option<String>,
    bounds: (usize, usize),
) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => {
            check_length(errors, field, &text, bounds).then_some(text)
        }
        _ => {
            errors.push(FieldError::new(field, format!("{field} is required")));
            None
        }
    }
}

fn check_length(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    text: &str,
    (min, max): (usize, usize),
) -> bool {
    let length = text.chars().count();
    let ok = (min..=max).contains(&length);
    if !ok {
        errors.push(FieldError::new(
            field,
            format!("{field} must be between {min} and {max} characters"),
        ));
    }
    ok
}

/// A ticket as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    /// Ticket id
    pub id: TicketId,
    /// Short summary
    pub title: String,
    /// Full problem description
    pub description: String,
    /// Priority code
    pub priority: Priority,
    /// Status code
    pub status: TicketStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            title: ticket.title,
            description: ticket.description,
            priority: ticket.priority,
            status: ticket.status,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

/// Ticket counts per status.
pub type StatisticsResponse = TicketStatistics;

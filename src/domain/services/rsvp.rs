use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::domain::models::event::{Event, PublicEvent};
use crate::domain::models::guest::{Guest, RsvpResponse, RsvpStatus};
use crate::domain::ports::{EventRepository, GuestRepository};
use crate::domain::services::guest_import::non_empty;
use crate::error::AppError;

/// Guest-facing view of an invitation.
#[derive(Debug, Serialize)]
pub struct InvitationView {
    pub guest: InvitedGuest,
    pub event: PublicEvent,
}

#[derive(Debug, Serialize)]
pub struct InvitedGuest {
    pub id: String,
    pub name: String,
    pub rsvp_status: String,
    pub plus_one: bool,
    pub plus_one_name: Option<String>,
    pub dietary: Option<String>,
    pub notes: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<&Guest> for InvitedGuest {
    fn from(guest: &Guest) -> Self {
        Self {
            id: guest.id.clone(),
            name: guest.name.clone(),
            rsvp_status: guest.rsvp_status.clone(),
            plus_one: guest.plus_one,
            plus_one_name: guest.plus_one_name.clone(),
            dietary: guest.dietary.clone(),
            notes: guest.notes.clone(),
            responded_at: guest.responded_at,
        }
    }
}

fn invitation(guest: &Guest, event: &Event) -> InvitationView {
    InvitationView {
        guest: InvitedGuest::from(guest),
        event: PublicEvent::from(event),
    }
}

/// Only `confirmed` and `declined` are answers; a guest can never go back to `pending`.
pub fn parse_requested_status(raw: &str) -> Result<RsvpStatus, AppError> {
    match raw.trim().parse::<RsvpStatus>() {
        Ok(RsvpStatus::Pending) => Err(AppError::Validation(
            "A response must be either confirmed or declined".into(),
        )),
        Ok(status) => Ok(status),
        Err(_) => Err(AppError::Validation("Invalid status".into())),
    }
}

/// The token is the only credential on the public surface. Every failed lookup
/// maps to [`AppError::InvalidToken`].
pub struct RsvpService {
    guest_repo: Arc<dyn GuestRepository>,
    event_repo: Arc<dyn EventRepository>,
}

impl RsvpService {
    pub fn new(guest_repo: Arc<dyn GuestRepository>, event_repo: Arc<dyn EventRepository>) -> Self {
        Self { guest_repo, event_repo }
    }

    async fn event_of(&self, guest: &Guest) -> Result<Event, AppError> {
        self.event_repo.find_by_id(&guest.event_id).await?
            .ok_or(AppError::InvalidToken)
    }

    /// Hidden while the event is unpublished, unless the guest has already answered.
    pub async fn view(&self, token: &str) -> Result<InvitationView, AppError> {
        let guest = self.guest_repo.find_by_token(token).await?
            .ok_or(AppError::InvalidToken)?;
        let event = self.event_of(&guest).await?;

        if !event.is_published && guest.status() == RsvpStatus::Pending {
            return Err(AppError::InvalidToken);
        }

        Ok(invitation(&guest, &event))
    }

    /// Overwrites any earlier answer and always re-stamps `responded_at`.
    pub async fn respond(
        &self,
        token: &str,
        status: RsvpStatus,
        plus_one_name: Option<&str>,
        dietary: Option<&str>,
        notes: Option<&str>,
    ) -> Result<InvitationView, AppError> {
        if status == RsvpStatus::Pending {
            return Err(AppError::Validation("A response must be either confirmed or declined".into()));
        }

        let response = RsvpResponse {
            status,
            plus_one_name: non_empty(plus_one_name),
            dietary: non_empty(dietary),
            notes: non_empty(notes),
            responded_at: Utc::now(),
        };

        let guest = self.guest_repo.record_response(token, &response).await?
            .ok_or(AppError::InvalidToken)?;
        let event = self.event_of(&guest).await?;

        info!(guest_id = %guest.id, status = %status, "RSVP recorded");

        Ok(invitation(&guest, &event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requested_status() {
        assert_eq!(parse_requested_status("confirmed").unwrap(), RsvpStatus::Confirmed);
        assert_eq!(parse_requested_status(" declined ").unwrap(), RsvpStatus::Declined);
        assert!(matches!(parse_requested_status("pending"), Err(AppError::Validation(_))));
        assert!(matches!(parse_requested_status("maybe"), Err(AppError::Validation(_))));
        assert!(matches!(parse_requested_status(""), Err(AppError::Validation(_))));
    }
}

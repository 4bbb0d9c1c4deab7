//! Resolve-and-authorize: one lookup per entity, keyed by the acting host.
//! "Does not exist" and "belongs to someone else" produce the same error.

use crate::domain::models::{event::Event, guest::Guest, import_draft::ImportDraft};
use crate::domain::ports::{EventRepository, GuestRepository, ImportDraftRepository};
use crate::error::AppError;

pub async fn owned_event(repo: &dyn EventRepository, owner_id: &str, event_id: &str) -> Result<Event, AppError> {
    repo.find_owned(owner_id, event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))
}

pub async fn owned_guest(repo: &dyn GuestRepository, owner_id: &str, guest_id: &str) -> Result<Guest, AppError> {
    repo.find_owned(owner_id, guest_id).await?
        .ok_or(AppError::NotFound("Guest not found".into()))
}

pub async fn owned_draft(repo: &dyn ImportDraftRepository, owner_id: &str, draft_id: &str) -> Result<ImportDraft, AppError> {
    repo.find_owned(owner_id, draft_id).await?
        .ok_or(AppError::NotFound("Import not found".into()))
}

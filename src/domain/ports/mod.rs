use crate::domain::models::{
    event::Event, guest::{Guest, RsvpResponse}, user::User, import_draft::ImportDraft,
    auth::RefreshTokenRecord, workbook::Workbook
};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

/// Every host-side lookup is keyed by `(owner_id, id)` so a miss never says why.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_owned(&self, owner_id: &str, id: &str) -> Result<Option<Event>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError>;
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait GuestRepository: Send + Sync {
    async fn create(&self, guest: &Guest) -> Result<Guest, AppError>;
    /// All-or-nothing: either every guest is stored or none is.
    async fn create_many(&self, guests: &[Guest]) -> Result<usize, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Guest>, AppError>;
    /// Resolves a guest through its parent event's owner.
    async fn find_owned(&self, owner_id: &str, id: &str) -> Result<Option<Guest>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Guest>, AppError>;
    /// Writes host-editable fields only; status, token and response fields are left alone.
    async fn update_details(&self, guest: &Guest) -> Result<Guest, AppError>;
    async fn record_response(&self, token: &str, response: &RsvpResponse) -> Result<Option<Guest>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ImportDraftRepository: Send + Sync {
    async fn create(&self, draft: &ImportDraft) -> Result<ImportDraft, AppError>;
    /// Expired drafts are treated as absent.
    async fn find_owned(&self, owner_id: &str, id: &str) -> Result<Option<ImportDraft>, AppError>;
    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), AppError>;
    async fn delete_expired(&self) -> Result<u64, AppError>;
}

/// Turns raw upload bytes into named sheets of string cells.
pub trait SpreadsheetDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8], file_name: Option<&str>) -> Result<Workbook, AppError>;
}

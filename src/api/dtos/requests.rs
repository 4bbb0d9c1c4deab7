use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::services::guest_import::ColumnMapping;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub name: String,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Absent fields are left untouched. An empty `date` string clears the date.
#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub template: Option<String>,
    pub template_config: Option<serde_json::Value>,
    pub is_published: Option<bool>,
    pub cover_image: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct GuestPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dietary: Option<String>,
    #[serde(alias = "plusOne")]
    pub plus_one: Option<bool>,
}

#[derive(Deserialize)]
pub struct BulkGuestsRequest {
    #[serde(default)]
    pub guests: Vec<GuestPayload>,
}

#[derive(Deserialize, Default)]
pub struct CommitImportRequest {
    pub sheet: Option<String>,
    pub mapping: Option<ColumnMapping>,
}

#[derive(Deserialize)]
pub struct PreviewQuery {
    pub sheet: Option<String>,
}

#[derive(Deserialize)]
pub struct RsvpSubmitRequest {
    #[serde(default)]
    pub status: String,
    #[serde(alias = "plusOneName")]
    pub plus_one_name: Option<String>,
    pub dietary: Option<String>,
    pub notes: Option<String>,
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

use crate::domain::models::workbook::Workbook;
use crate::error::AppError;

pub const DRAFT_TTL_HOURS: i64 = 24;

/// A parsed upload parked between the parse step and the commit step of an import.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ImportDraft {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub file_name: Option<String>,
    #[serde(skip_serializing)]
    pub sheets_json: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ImportDraft {
    pub fn new(user_id: String, event_id: String, file_name: Option<String>, workbook: &Workbook) -> Result<Self, AppError> {
        let sheets_json = serde_json::to_string(workbook)
            .map_err(|e| AppError::InternalWithMsg(format!("Failed to serialize workbook: {}", e)))?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            event_id,
            file_name,
            sheets_json,
            expires_at: now + Duration::hours(DRAFT_TTL_HOURS),
            created_at: now,
        })
    }

    pub fn workbook(&self) -> Result<Workbook, AppError> {
        serde_json::from_str(&self.sheets_json)
            .map_err(|e| AppError::InternalWithMsg(format!("Corrupt import draft {}: {}", self.id, e)))
    }
}

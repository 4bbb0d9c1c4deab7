use crate::domain::{models::import_draft::ImportDraft, ports::ImportDraftRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteImportDraftRepo {
    pool: SqlitePool,
}

impl SqliteImportDraftRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportDraftRepository for SqliteImportDraftRepo {
    async fn create(&self, draft: &ImportDraft) -> Result<ImportDraft, AppError> {
        sqlx::query_as::<_, ImportDraft>(
            "INSERT INTO import_drafts (id, user_id, event_id, file_name, sheets_json, expires_at, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id, user_id, event_id, file_name, sheets_json, expires_at, created_at",
        )
            .bind(&draft.id)
            .bind(&draft.user_id)
            .bind(&draft.event_id)
            .bind(&draft.file_name)
            .bind(&draft.sheets_json)
            .bind(draft.expires_at)
            .bind(draft.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_owned(&self, owner_id: &str, id: &str) -> Result<Option<ImportDraft>, AppError> {
        sqlx::query_as::<_, ImportDraft>(
            "SELECT id, user_id, event_id, file_name, sheets_json, expires_at, created_at FROM import_drafts WHERE id = ? AND user_id = ? AND expires_at > ?",
        )
            .bind(id)
            .bind(owner_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM import_drafts WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Import not found".into()));
        }
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM import_drafts WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}

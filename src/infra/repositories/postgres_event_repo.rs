use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

const EVENT_COLUMNS: &str = "id, user_id, name, slug, date, location, description, template, config_json, cover_image, is_published, created_at";

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(&format!(
            r#"INSERT INTO events (
                id, user_id, name, slug, date, location, description,
                template, config_json, cover_image, is_published, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {EVENT_COLUMNS}"#
        ))
            .bind(&event.id)
            .bind(&event.user_id)
            .bind(&event.name)
            .bind(&event.slug)
            .bind(event.date)
            .bind(&event.location)
            .bind(&event.description)
            .bind(&event.template)
            .bind(&event.config_json)
            .bind(&event.cover_image)
            .bind(event.is_published)
            .bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_owned(&self, owner_id: &str, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE user_id = $1 AND id = $2"
        ))
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE slug = $1 AND is_published = $2"
        ))
            .bind(slug)
            .bind(true)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE user_id = $1 ORDER BY created_at DESC"
        ))
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(&format!(
            r#"UPDATE events SET
                name=$1, date=$2, location=$3, description=$4,
                template=$5, config_json=$6, cover_image=$7, is_published=$8
               WHERE id=$9 AND user_id=$10 RETURNING {EVENT_COLUMNS}"#
        ))
            .bind(&event.name)
            .bind(event.date)
            .bind(&event.location)
            .bind(&event.description)
            .bind(&event.template)
            .bind(&event.config_json)
            .bind(&event.cover_image)
            .bind(event.is_published)
            .bind(&event.id)
            .bind(&event.user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found".into()))
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }
}

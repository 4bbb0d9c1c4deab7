use crate::domain::{models::guest::{Guest, RsvpResponse}, ports::GuestRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const GUEST_COLUMNS: &str = "id, event_id, name, email, phone, rsvp_token, rsvp_status, plus_one, plus_one_name, dietary, notes, responded_at, created_at";

// 13 binds per row keeps a chunk well under the bind-parameter limit.
const INSERT_CHUNK: usize = 500;

pub struct SqliteGuestRepo {
    pool: SqlitePool,
}

impl SqliteGuestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuestRepository for SqliteGuestRepo {
    async fn create(&self, guest: &Guest) -> Result<Guest, AppError> {
        sqlx::query_as::<_, Guest>(&format!(
            "INSERT INTO guests ({GUEST_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {GUEST_COLUMNS}"
        ))
            .bind(&guest.id)
            .bind(&guest.event_id)
            .bind(&guest.name)
            .bind(&guest.email)
            .bind(&guest.phone)
            .bind(&guest.rsvp_token)
            .bind(&guest.rsvp_status)
            .bind(guest.plus_one)
            .bind(&guest.plus_one_name)
            .bind(&guest.dietary)
            .bind(&guest.notes)
            .bind(guest.responded_at)
            .bind(guest.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create_many(&self, guests: &[Guest]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        for chunk in guests.chunks(INSERT_CHUNK) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!("INSERT INTO guests ({GUEST_COLUMNS}) "));
            builder.push_values(chunk, |mut row, guest| {
                row.push_bind(guest.id.clone())
                    .push_bind(guest.event_id.clone())
                    .push_bind(guest.name.clone())
                    .push_bind(guest.email.clone())
                    .push_bind(guest.phone.clone())
                    .push_bind(guest.rsvp_token.clone())
                    .push_bind(guest.rsvp_status.clone())
                    .push_bind(guest.plus_one)
                    .push_bind(guest.plus_one_name.clone())
                    .push_bind(guest.dietary.clone())
                    .push_bind(guest.notes.clone())
                    .push_bind(guest.responded_at)
                    .push_bind(guest.created_at);
            });
            builder.build()
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(guests.len())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE rsvp_token = ?"
        ))
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_owned(&self, owner_id: &str, id: &str) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>(
            r#"SELECT g.id, g.event_id, g.name, g.email, g.phone, g.rsvp_token, g.rsvp_status,
                      g.plus_one, g.plus_one_name, g.dietary, g.notes, g.responded_at, g.created_at
               FROM guests g
               JOIN events e ON e.id = g.event_id
               WHERE g.id = ? AND e.user_id = ?"#,
        )
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Guest>, AppError> {
        sqlx::query_as::<_, Guest>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE event_id = ? ORDER BY name, created_at"
        ))
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_details(&self, guest: &Guest) -> Result<Guest, AppError> {
        sqlx::query_as::<_, Guest>(&format!(
            "UPDATE guests SET name=?, email=?, phone=?, dietary=?, plus_one=? WHERE id=? RETURNING {GUEST_COLUMNS}"
        ))
            .bind(&guest.name)
            .bind(&guest.email)
            .bind(&guest.phone)
            .bind(&guest.dietary)
            .bind(guest.plus_one)
            .bind(&guest.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Guest not found".into()))
    }

    async fn record_response(&self, token: &str, response: &RsvpResponse) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>(&format!(
            "UPDATE guests SET rsvp_status=?, plus_one_name=?, dietary=?, notes=?, responded_at=? WHERE rsvp_token=? RETURNING {GUEST_COLUMNS}"
        ))
            .bind(response.status.as_str())
            .bind(&response.plus_one_name)
            .bind(&response.dietary)
            .bind(&response.notes)
            .bind(response.responded_at)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM guests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Guest not found".into()));
        }
        Ok(())
    }
}

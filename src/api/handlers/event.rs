use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use chrono::{DateTime, Utc};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::{CreateEventRequest, UpdateEventRequest},
    responses::EventResponse,
};
use crate::domain::models::event::{Event, PublicEvent, Template};
use crate::domain::services::{access::owned_event, guests::guest_stats, guest_import::non_empty, slug::event_slug};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

const SLUG_ATTEMPTS: usize = 5;

async fn with_stats(state: &AppState, event: Event) -> Result<EventResponse, AppError> {
    let guests = state.guest_repo.list_by_event(&event.id).await?;
    Ok(EventResponse::new(event, guest_stats(&guests)))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = non_empty(Some(payload.name.as_str()))
        .ok_or(AppError::Validation("Event name is required".into()))?;

    let mut attempt = 1;
    let created = loop {
        let mut event = Event::new(user_id.clone(), name.clone(), event_slug(&name));
        event.date = payload.date;
        event.location = non_empty(payload.location.as_deref());
        event.description = non_empty(payload.description.as_deref());

        match state.event_repo.create(&event).await {
            Err(e) if e.is_unique_violation() && attempt < SLUG_ATTEMPTS => {
                warn!("Slug collision on {}, regenerating", event.slug);
                attempt += 1;
            }
            other => break other?,
        }
    };

    info!("Event created: {} ({})", created.id, created.slug);

    Ok((StatusCode::CREATED, Json(EventResponse::new(created, Default::default()))))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_by_owner(&user_id).await?;

    let mut response = Vec::with_capacity(events.len());
    for event in events {
        response.push(with_stats(&state, event).await?);
    }

    Ok(Json(response))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = owned_event(state.event_repo.as_ref(), &user_id, &event_id).await?;
    Ok(Json(with_stats(&state, event).await?))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = owned_event(state.event_repo.as_ref(), &user_id, &event_id).await?;

    if let Some(name) = payload.name {
        event.name = non_empty(Some(name.as_str()))
            .ok_or(AppError::Validation("Event name is required".into()))?;
    }
    if let Some(date) = payload.date {
        event.date = match date.trim() {
            "" => None,
            raw => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|_| AppError::Validation("Invalid date, expected RFC 3339".into()))?
                    .with_timezone(&Utc),
            ),
        };
    }
    if let Some(location) = payload.location {
        event.location = non_empty(Some(location.as_str()));
    }
    if let Some(description) = payload.description {
        event.description = non_empty(Some(description.as_str()));
    }
    if let Some(template) = payload.template {
        let template: Template = template.parse().map_err(AppError::Validation)?;
        event.template = template.to_string();
    }
    if let Some(config) = payload.template_config {
        if !config.is_object() {
            return Err(AppError::Validation("template_config must be an object".into()));
        }
        event.config_json = config.to_string();
    }
    if let Some(published) = payload.is_published {
        event.is_published = published;
    }
    if let Some(cover) = payload.cover_image {
        event.cover_image = non_empty(Some(cover.as_str()));
    }

    let updated = state.event_repo.update(&event).await?;
    info!("Updated event: {}", updated.id);

    Ok(Json(with_stats(&state, updated).await?))
}

/// Guests and pending imports go with the event.
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.event_repo.delete(&user_id, &event_id).await?;
    info!("Deleted event: {}", event_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn get_public_event(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_published_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    Ok(Json(PublicEvent::from(&event)))
}

use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{requests::GuestPayload, responses::GuestLink};
use crate::domain::models::guest::GuestDetails;
use crate::domain::services::{
    access::{owned_event, owned_guest},
    guest_import::guest_details,
    guests::insert_guest,
    links::{rsvp_link, whatsapp_link},
};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

fn required_name() -> AppError {
    AppError::Validation("Guest name is required".into())
}

pub async fn list_guests(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = owned_event(state.event_repo.as_ref(), &user_id, &event_id).await?;
    let guests = state.guest_repo.list_by_event(&event.id).await?;
    Ok(Json(guests))
}

pub async fn create_guest(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<GuestPayload>,
) -> Result<impl IntoResponse, AppError> {
    let event = owned_event(state.event_repo.as_ref(), &user_id, &event_id).await?;

    let details = guest_details(
        payload.name.as_deref(),
        payload.email.as_deref(),
        payload.phone.as_deref(),
        payload.dietary.as_deref(),
        payload.plus_one.unwrap_or(false),
    )
    .ok_or_else(required_name)?;

    let guest = insert_guest(state.guest_repo.as_ref(), details.into_guest(event.id)).await?;
    info!("Guest added: {} to event {}", guest.id, guest.event_id);

    Ok((StatusCode::CREATED, Json(guest)))
}

/// Only contact details change here; status, token and the guest's own answers are kept.
pub async fn update_guest(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(guest_id): Path<String>,
    Json(payload): Json<GuestPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut guest = owned_guest(state.guest_repo.as_ref(), &user_id, &guest_id).await?;

    let details: GuestDetails = guest_details(
        payload.name.as_deref().or(Some(guest.name.as_str())),
        payload.email.as_deref().or(guest.email.as_deref()),
        payload.phone.as_deref().or(guest.phone.as_deref()),
        payload.dietary.as_deref().or(guest.dietary.as_deref()),
        payload.plus_one.unwrap_or(guest.plus_one),
    )
    .ok_or_else(required_name)?;

    details.apply_to(&mut guest);
    let updated = state.guest_repo.update_details(&guest).await?;
    info!("Updated guest: {}", updated.id);

    Ok(Json(updated))
}

pub async fn delete_guest(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(guest_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let guest = owned_guest(state.guest_repo.as_ref(), &user_id, &guest_id).await?;
    state.guest_repo.delete(&guest.id).await?;
    info!("Deleted guest: {}", guest.id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_guest_links(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = owned_event(state.event_repo.as_ref(), &user_id, &event_id).await?;
    let guests = state.guest_repo.list_by_event(&event.id).await?;

    let links: Vec<GuestLink> = guests
        .into_iter()
        .map(|guest| {
            let link = rsvp_link(&state.config.public_base_url, &event.slug, &guest.rsvp_token);
            GuestLink {
                whatsapp_link: whatsapp_link(&guest.name, &link, guest.phone.as_deref()),
                rsvp_link: link,
                guest_id: guest.id,
                name: guest.name,
                rsvp_status: guest.rsvp_status,
            }
        })
        .collect();

    Ok(Json(links))
}

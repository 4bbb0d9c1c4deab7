use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::RsvpSubmitRequest;
use crate::domain::services::rsvp::parse_requested_status;
use crate::error::AppError;
use std::sync::Arc;

pub async fn get_invitation(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.rsvp_service.view(&token).await?;
    Ok(Json(view))
}

/// The token is the only credential a guest holds.
pub async fn submit_rsvp(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(payload): Json<RsvpSubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status = parse_requested_status(&payload.status)?;

    let view = state.rsvp_service
        .respond(
            &token,
            status,
            payload.plus_one_name.as_deref(),
            payload.dietary.as_deref(),
            payload.notes.as_deref(),
        )
        .await?;

    Ok(Json(view))
}

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{BulkGuestsRequest, CommitImportRequest, PreviewQuery};
use crate::domain::services::guest_import::{guest_details, ColumnMapping};
use crate::domain::services::import_service::UploadedFile;
use crate::error::AppError;
use std::sync::Arc;
use tracing::debug;

struct ImportForm {
    file: UploadedFile,
    sheet: Option<String>,
    mapping: Option<ColumnMapping>,
}

/// Fields: `file` (required), `sheet` and `mapping` (JSON object) optional.
async fn read_form(mut multipart: Multipart, limit: usize) -> Result<ImportForm, AppError> {
    let bad_multipart = |e: MultipartError| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(limit),
        _ => AppError::Validation(e.body_text()),
    };

    let mut file: Option<UploadedFile> = None;
    let mut sheet: Option<String> = None;
    let mut mapping: Option<ColumnMapping> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                debug!("Received upload {:?} ({} bytes)", file_name, bytes.len());
                file = Some(UploadedFile { file_name, bytes: bytes.to_vec() });
            }
            "sheet" => {
                let text = field.text().await.map_err(bad_multipart)?;
                sheet = Some(text).filter(|s| !s.trim().is_empty());
            }
            "mapping" => {
                let text = field.text().await.map_err(bad_multipart)?;
                if !text.trim().is_empty() {
                    let parsed = serde_json::from_str(&text)
                        .map_err(|_| AppError::Validation("Invalid column mapping".into()))?;
                    mapping = Some(parsed);
                }
            }
            _ => {}
        }
    }

    let file = file.ok_or(AppError::Validation("Missing file".into()))?;
    Ok(ImportForm { file, sheet, mapping })
}

pub async fn import_guests(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_form(multipart, state.config.max_upload_bytes).await?;

    let outcome = state.import_service
        .import_file(&user_id, &event_id, form.file, form.sheet.as_deref(), form.mapping)
        .await?;

    Ok(Json(outcome))
}

pub async fn stage_import(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_form(multipart, state.config.max_upload_bytes).await?;
    let summary = state.import_service.stage_file(&user_id, &event_id, form.file).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

pub async fn preview_import(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(draft_id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Result<impl IntoResponse, AppError> {
    let preview = state.import_service
        .preview(&user_id, &draft_id, query.sheet.as_deref())
        .await?;
    Ok(Json(preview))
}

pub async fn commit_import(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(draft_id): Path<String>,
    Json(payload): Json<CommitImportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state.import_service
        .commit_draft(&user_id, &draft_id, payload.sheet.as_deref(), payload.mapping)
        .await?;
    Ok(Json(summary))
}

pub async fn discard_import(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(draft_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.import_service.discard_draft(&user_id, &draft_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Rows already mapped client-side, one object per guest.
pub async fn bulk_import(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<BulkGuestsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let rows = payload.guests
        .iter()
        .map(|g| guest_details(
            g.name.as_deref(),
            g.email.as_deref(),
            g.phone.as_deref(),
            g.dietary.as_deref(),
            g.plus_one.unwrap_or(false),
        ))
        .collect();

    let summary = state.import_service.import_mapped(&user_id, &event_id, rows).await?;
    Ok(Json(summary))
}

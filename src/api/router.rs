use axum::{
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath, Request},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, auth, event, guest, import, rsvp};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

/// Route template rather than the raw path, so RSVP tokens never reach the logs.
fn route_of(request: &Request<Body>) -> &str {
    request.extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or("<unmatched>")
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Events
        .route("/api/v1/events", post(event::create_event).get(event::list_events))
        .route("/api/v1/events/{event_id}", get(event::get_event).put(event::update_event).delete(event::delete_event))
        .route("/api/v1/public/events/{slug}", get(event::get_public_event))

        // Guests
        .route("/api/v1/events/{event_id}/guests", get(guest::list_guests).post(guest::create_guest))
        .route("/api/v1/events/{event_id}/guests/links", get(guest::list_guest_links))
        .route("/api/v1/guests/{guest_id}", put(guest::update_guest).delete(guest::delete_guest))

        // Import
        .route("/api/v1/events/{event_id}/guests/import", post(import::import_guests))
        .route("/api/v1/events/{event_id}/guests/bulk", post(import::bulk_import))
        .route("/api/v1/events/{event_id}/imports", post(import::stage_import))
        .route("/api/v1/imports/{draft_id}", get(import::preview_import).delete(import::discard_import))
        .route("/api/v1/imports/{draft_id}/commit", post(import::commit_import))

        // Public RSVP
        .route("/api/v1/rsvp/{token}", get(rsvp::get_invitation).post(rsvp::submit_rsvp))

        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        route = %route_of(request),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), route_of(request));
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

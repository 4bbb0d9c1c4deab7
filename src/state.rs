use std::sync::Arc;
use crate::domain::ports::{EventRepository, GuestRepository, UserRepository};
use crate::domain::services::{auth_service::AuthService, import_service::ImportService, rsvp::RsvpService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub guest_repo: Arc<dyn GuestRepository>,
    pub auth_service: Arc<AuthService>,
    pub import_service: Arc<ImportService>,
    pub rsvp_service: Arc<RsvpService>,
}

use serde::Serialize;

use crate::domain::models::event::{Event, GuestStats};

#[derive(Serialize)]
pub struct EventResponse {
    #[serde(flatten)]
    pub event: Event,
    pub template_config: serde_json::Value,
    pub stats: GuestStats,
}

impl EventResponse {
    pub fn new(event: Event, stats: GuestStats) -> Self {
        let template_config = event.template_config();
        Self { event, template_config, stats }
    }
}

#[derive(Serialize)]
pub struct GuestLink {
    pub guest_id: String,
    pub name: String,
    pub rsvp_status: String,
    pub rsvp_link: String,
    pub whatsapp_link: String,
}

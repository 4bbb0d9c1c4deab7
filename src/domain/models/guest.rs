use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::domain::services::tokens::generate_rsvp_token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Pending,
    Confirmed,
    Declined,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Pending => "pending",
            RsvpStatus::Confirmed => "confirmed",
            RsvpStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RsvpStatus::Pending),
            "confirmed" => Ok(RsvpStatus::Confirmed),
            "declined" => Ok(RsvpStatus::Declined),
            other => Err(format!("Unknown RSVP status '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Guest {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub rsvp_token: String,
    pub rsvp_status: String, // pending, confirmed, declined
    pub plus_one: bool,
    pub plus_one_name: Option<String>,
    pub dietary: Option<String>,
    pub notes: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Guest {
    /// A fresh, unanswered guest carrying its own RSVP token.
    pub fn new(event_id: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            name,
            email: None,
            phone: None,
            rsvp_token: generate_rsvp_token(),
            rsvp_status: RsvpStatus::Pending.to_string(),
            plus_one: false,
            plus_one_name: None,
            dietary: None,
            notes: None,
            responded_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> RsvpStatus {
        self.rsvp_status.parse().unwrap_or(RsvpStatus::Pending)
    }
}

/// Host-editable guest fields after trimming. Status and token are never part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestDetails {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dietary: Option<String>,
    pub plus_one: bool,
}

impl GuestDetails {
    pub fn apply_to(self, guest: &mut Guest) {
        guest.name = self.name;
        guest.email = self.email;
        guest.phone = self.phone;
        guest.dietary = self.dietary;
        guest.plus_one = self.plus_one;
    }

    pub fn into_guest(self, event_id: String) -> Guest {
        let mut guest = Guest::new(event_id, String::new());
        self.apply_to(&mut guest);
        guest
    }
}

/// What a guest sends from the public page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpResponse {
    pub status: RsvpStatus,
    pub plus_one_name: Option<String>,
    pub dietary: Option<String>,
    pub notes: Option<String>,
    pub responded_at: DateTime<Utc>,
}

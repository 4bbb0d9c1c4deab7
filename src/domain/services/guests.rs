use crate::domain::models::event::GuestStats;
use crate::domain::models::guest::{Guest, RsvpStatus};
use crate::domain::ports::GuestRepository;
use crate::domain::services::tokens::generate_rsvp_token;
use crate::error::AppError;
use tracing::warn;

const TOKEN_ATTEMPTS: usize = 3;

/// Inserts a single guest. A token collision is rejected by the store; the guest is
/// then retried with a fresh token rather than overwriting anything.
pub async fn insert_guest(repo: &dyn GuestRepository, mut guest: Guest) -> Result<Guest, AppError> {
    let mut attempt = 1;
    loop {
        match repo.create(&guest).await {
            Err(e) if e.is_unique_violation() && attempt < TOKEN_ATTEMPTS => {
                warn!("RSVP token collision for guest {}, regenerating", guest.id);
                guest.rsvp_token = generate_rsvp_token();
                attempt += 1;
            }
            other => return other,
        }
    }
}

/// Atomic batch insert; on a token collision the whole batch is re-tokenized and retried.
pub async fn insert_guests(repo: &dyn GuestRepository, mut guests: Vec<Guest>) -> Result<usize, AppError> {
    let mut attempt = 1;
    loop {
        match repo.create_many(&guests).await {
            Err(e) if e.is_unique_violation() && attempt < TOKEN_ATTEMPTS => {
                warn!("RSVP token collision in batch of {}, regenerating", guests.len());
                for guest in guests.iter_mut() {
                    guest.rsvp_token = generate_rsvp_token();
                }
                attempt += 1;
            }
            other => return other,
        }
    }
}

pub fn guest_stats(guests: &[Guest]) -> GuestStats {
    guests.iter().fold(GuestStats::default(), |mut stats, guest| {
        stats.total += 1;
        match guest.status() {
            RsvpStatus::Confirmed => stats.confirmed += 1,
            RsvpStatus::Declined => stats.declined += 1,
            RsvpStatus::Pending => stats.pending += 1,
        }
        stats
    })
}

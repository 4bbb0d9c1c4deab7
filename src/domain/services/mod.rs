pub mod access;
pub mod auth_service;
pub mod guest_import;
pub mod guests;
pub mod import_service;
pub mod links;
pub mod rsvp;
pub mod slug;
pub mod tokens;

pub mod auth;
pub mod event;
pub mod guest;
pub mod import_draft;
pub mod user;
pub mod workbook;

pub mod decoder;
pub mod factory;
pub mod repositories;

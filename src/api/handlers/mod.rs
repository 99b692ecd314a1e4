pub mod auth;
pub mod event;
pub mod health;
pub mod profile;
pub mod registration;

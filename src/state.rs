use std::sync::Arc;
use crate::domain::ports::{
    AuthRepository, EmailService, EventRepository, RegistrationRepository, UserRepository,
};
use crate::domain::services::{auth_service::AuthService, registration_service::RegistrationService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub auth_service: Arc<AuthService>,
    pub registration_service: Arc<RegistrationService>,
    pub email_service: Arc<dyn EmailService>,
}

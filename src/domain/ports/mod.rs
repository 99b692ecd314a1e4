use crate::domain::models::{
    auth::{PasswordResetRecord, RefreshTokenRecord},
    event::{Event, EventFilter},
    registration::Registration,
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn update_profile(&self, id: &str, display_name: &str, photo_url: Option<&str>) -> Result<User, AppError>;
    async fn update_password(&self, id: &str, password_hash: &str) -> Result<(), AppError>;
    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;

    async fn create_password_reset(&self, record: &PasswordResetRecord) -> Result<(), AppError>;
    async fn find_password_reset(&self, token_hash: &str) -> Result<Option<PasswordResetRecord>, AppError>;
    async fn delete_password_reset(&self, token_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn create(&self, registration: &Registration) -> Result<Registration, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError>;
    async fn find_by_ticket(&self, ticket_id: &str) -> Result<Option<Registration>, AppError>;
    async fn find_by_event_and_user(&self, event_id: &str, user_id: &str) -> Result<Option<Registration>, AppError>;
    async fn count_confirmed(&self, event_id: &str) -> Result<i64, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Registration>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Registration>, AppError>;
    async fn update_status(&self, id: &str, status: &str) -> Result<Registration, AppError>;
    async fn set_check_in(&self, id: &str, at: DateTime<Utc>) -> Result<Registration, AppError>;
    async fn set_feedback(&self, id: &str, rating: i32, comment: Option<&str>, at: DateTime<Utc>) -> Result<Registration, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,

    #[serde(rename = "https://eventhub.app/claims/role")]
    pub role: String,

    #[serde(rename = "https://eventhub.app/claims/email")]
    pub email: String,

    #[serde(rename = "https://eventhub.app/claims/name")]
    pub display_name: String,

    #[serde(rename = "https://eventhub.app/claims/csrf")]
    pub csrf_token: String,
}

/// The authenticated principal carried through a request. Decoded from the
/// access token; the users table stays the source of truth for the profile.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == super::user::ROLE_ADMIN
    }

    pub fn can_manage_events(&self) -> bool {
        self.role == super::user::ROLE_ORGANIZER || self.is_admin()
    }
}

#[derive(Debug, FromRow)]
pub struct RefreshTokenRecord {
    pub token_hash: String,
    pub user_id: String,
    pub family_id: Uuid,
    pub generation_id: i32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct PasswordResetRecord {
    pub token_hash: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub csrf_token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub photo_url: Option<String>,
}

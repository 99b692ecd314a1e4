use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Keeps `"field": null` distinguishable from an absent field: present input
/// (null included) lands in `Some`, a missing key stays `None` via default.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    // Double option: omitted keeps the stored value, explicit null clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub photo_url: Option<Option<String>>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_virtual: bool,
    pub virtual_link: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub image_url: Option<String>,
    pub capacity: i32,
    pub price: f64,
    pub currency: String,
    pub category_id: String,
    pub category_name: String,
    pub category_color: String,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
    pub registration_deadline: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_virtual: Option<bool>,
    pub virtual_link: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub image_url: Option<String>,
    pub capacity: Option<i32>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct ListEventsQuery {
    pub organizer_id: Option<String>,
    pub is_published: Option<bool>,
    pub from_date: Option<DateTime<Utc>>,
    pub category_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct SubmitFeedbackRequest {
    pub rating: i32,
    pub comment: Option<String>,
}

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// An organizer-published gathering, physical or virtual. Location fields are
/// flattened into columns; `tags` is stored as a JSON array string and mapped
/// back to a list at the API boundary.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
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
    pub organizer_id: String,
    pub organizer_name: String,
    pub image_url: Option<String>,
    pub capacity: i32,
    pub price: f64,
    pub currency: String,
    pub category_id: String,
    pub category_name: String,
    pub category_color: String,
    pub tags: String,
    pub is_published: bool,
    pub registration_deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewEventParams {
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
    pub organizer_id: String,
    pub organizer_name: String,
    pub image_url: Option<String>,
    pub capacity: i32,
    pub price: f64,
    pub currency: String,
    pub category_id: String,
    pub category_name: String,
    pub category_color: String,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub registration_deadline: DateTime<Utc>,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            description: params.description,
            start_date: params.start_date,
            end_date: params.end_date,
            is_virtual: params.is_virtual,
            virtual_link: params.virtual_link,
            address: params.address,
            city: params.city,
            state: params.state,
            country: params.country,
            postal_code: params.postal_code,
            organizer_id: params.organizer_id,
            organizer_name: params.organizer_name,
            image_url: params.image_url,
            capacity: params.capacity,
            price: params.price,
            currency: params.currency,
            category_id: params.category_id,
            category_name: params.category_name,
            category_color: params.category_color,
            tags: serde_json::to_string(&params.tags).unwrap_or_else(|_| "[]".to_string()),
            is_published: params.is_published,
            registration_deadline: params.registration_deadline,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn tag_list(&self) -> Vec<String> {
        serde_json::from_str(&self.tags).unwrap_or_default()
    }
}

/// Filter set for the event list query. Results are always ordered by
/// `start_date` ascending; `limit` caps the row count with no continuation
/// cursor.
#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub organizer_id: Option<String>,
    pub is_published: Option<bool>,
    pub from_date: Option<DateTime<Utc>>,
    pub category_id: Option<String>,
    pub limit: Option<i64>,
}

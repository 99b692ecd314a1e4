use crate::domain::models::{event::Event, registration::Registration};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Wire shape for events: location and category fields regrouped, tags
/// decoded from the JSON column.
#[derive(Serialize)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: LocationResponse,
    pub organizer_id: String,
    pub organizer_name: String,
    pub image_url: Option<String>,
    pub capacity: i32,
    pub price: f64,
    pub currency: String,
    pub category: CategoryResponse,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub registration_deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct LocationResponse {
    pub is_virtual: bool,
    pub virtual_link: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            start_date: event.start_date,
            end_date: event.end_date,
            location: LocationResponse {
                is_virtual: event.is_virtual,
                virtual_link: event.virtual_link.clone(),
                address: event.address.clone(),
                city: event.city.clone(),
                state: event.state.clone(),
                country: event.country.clone(),
                postal_code: event.postal_code.clone(),
            },
            organizer_id: event.organizer_id.clone(),
            organizer_name: event.organizer_name.clone(),
            image_url: event.image_url.clone(),
            capacity: event.capacity,
            price: event.price,
            currency: event.currency.clone(),
            category: CategoryResponse {
                id: event.category_id.clone(),
                name: event.category_name.clone(),
                color: event.category_color.clone(),
            },
            tags: event.tag_list(),
            is_published: event.is_published,
            registration_deadline: event.registration_deadline,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct RegistrationResponse {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub ticket_id: String,
    pub status: String,
    pub payment_status: Option<String>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub feedback: Option<FeedbackResponse>,
    pub registration_date: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct FeedbackResponse {
    pub rating: i32,
    pub comment: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl From<&Registration> for RegistrationResponse {
    fn from(registration: &Registration) -> Self {
        let feedback = registration.feedback_rating.map(|rating| FeedbackResponse {
            rating,
            comment: registration.feedback_comment.clone(),
            submitted_at: registration.feedback_submitted_at,
        });

        Self {
            id: registration.id.clone(),
            event_id: registration.event_id.clone(),
            user_id: registration.user_id.clone(),
            user_email: registration.user_email.clone(),
            user_name: registration.user_name.clone(),
            ticket_id: registration.ticket_id.clone(),
            status: registration.status.clone(),
            payment_status: registration.payment_status.clone(),
            check_in_time: registration.check_in_time,
            feedback,
            registration_date: registration.created_at,
        }
    }
}

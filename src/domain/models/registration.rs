use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use rand::Rng;

pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const PAYMENT_PAID: &str = "paid";
pub const PAYMENT_UNPAID: &str = "unpaid";

/// A participant's claim on one seat of an event. Feedback is flattened into
/// three nullable columns; at most one feedback record per registration.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub ticket_id: String,
    pub status: String,
    pub payment_status: Option<String>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub feedback_rating: Option<i32>,
    pub feedback_comment: Option<String>,
    pub feedback_submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub struct NewRegistrationParams {
    pub event_id: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub event_price: f64,
}

impl Registration {
    pub fn new(params: NewRegistrationParams) -> Self {
        let payment_status = if params.event_price > 0.0 {
            PAYMENT_UNPAID
        } else {
            PAYMENT_PAID
        };

        Self {
            id: Uuid::new_v4().to_string(),
            event_id: params.event_id,
            user_id: params.user_id,
            user_email: params.user_email,
            user_name: params.user_name,
            ticket_id: generate_ticket_id(),
            status: STATUS_CONFIRMED.to_string(),
            payment_status: Some(payment_status.to_string()),
            check_in_time: None,
            feedback_rating: None,
            feedback_comment: None,
            feedback_submitted_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Time component plus random suffix. Unique with high probability only; the
/// UNIQUE constraint on the column catches the rest.
pub fn generate_ticket_id() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("TKT-{}-{}", Utc::now().timestamp_millis(), suffix)
}

use std::sync::Arc;
use crate::domain::{
    models::{
        auth::SessionUser,
        registration::{self, NewRegistrationParams, Registration},
    },
    ports::{EventRepository, RegistrationRepository},
};
use crate::error::AppError;
use chrono::Utc;
use tracing::{info, warn};

/// The registration workflow: capacity gate, ticket issuance, check-in and
/// feedback transitions. One remote round trip per step, no retries.
pub struct RegistrationService {
    event_repo: Arc<dyn EventRepository>,
    registration_repo: Arc<dyn RegistrationRepository>,
}

impl RegistrationService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        registration_repo: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self { event_repo, registration_repo }
    }

    pub async fn register(&self, event_id: &str, user: &SessionUser) -> Result<Registration, AppError> {
        let event = self.event_repo.find_by_id(event_id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        if !event.is_published {
            return Err(AppError::Forbidden("Event is not open for registration".into()));
        }

        if Utc::now() > event.registration_deadline {
            return Err(AppError::Validation("Registration deadline has passed".into()));
        }

        if let Some(existing) = self.registration_repo.find_by_event_and_user(event_id, &user.id).await?
            && existing.status != registration::STATUS_CANCELLED {
            return Err(AppError::Conflict("Already registered for this event".into()));
        }

        // The count and the insert below are separate statements with no
        // enclosing transaction: two concurrent registrations can both pass
        // the capacity check when one slot remains.
        let confirmed = self.registration_repo.count_confirmed(event_id).await?;
        if confirmed >= event.capacity as i64 {
            warn!("Registration rejected, event {} at capacity ({})", event_id, event.capacity);
            return Err(AppError::CapacityExceeded);
        }

        let registration = Registration::new(NewRegistrationParams {
            event_id: event.id.clone(),
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            user_name: user.display_name.clone(),
            event_price: event.price,
        });

        let created = self.registration_repo.create(&registration).await?;
        info!("Registration confirmed: {} ticket {} for event {}", created.id, created.ticket_id, event_id);
        Ok(created)
    }

    /// Attaches a feedback record. Calling twice overwrites the previous
    /// feedback silently (last-write-wins).
    pub async fn submit_feedback(
        &self,
        registration_id: &str,
        user: &SessionUser,
        rating: i32,
        comment: Option<&str>,
    ) -> Result<Registration, AppError> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation("Rating must be between 1 and 5".into()));
        }

        let registration = self.registration_repo.find_by_id(registration_id).await?
            .ok_or(AppError::NotFound("Registration not found".into()))?;

        if registration.user_id != user.id && !user.is_admin() {
            return Err(AppError::Forbidden("Not your registration".into()));
        }

        let event = self.event_repo.find_by_id(&registration.event_id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        if Utc::now() < event.start_date {
            return Err(AppError::Validation("Feedback can only be submitted after the event has started".into()));
        }

        self.registration_repo.set_feedback(registration_id, rating, comment, Utc::now()).await
    }

    /// Stamps the check-in time and forces status to confirmed. Re-invoking
    /// refreshes the timestamp without changing semantics.
    pub async fn check_in(&self, registration_id: &str) -> Result<Registration, AppError> {
        self.registration_repo.find_by_id(registration_id).await?
            .ok_or(AppError::NotFound("Registration not found".into()))?;

        let updated = self.registration_repo.set_check_in(registration_id, Utc::now()).await?;
        info!("Checked in registration {}", registration_id);
        Ok(updated)
    }

    pub async fn cancel(&self, registration_id: &str, user: &SessionUser) -> Result<Registration, AppError> {
        let registration = self.registration_repo.find_by_id(registration_id).await?
            .ok_or(AppError::NotFound("Registration not found".into()))?;

        if registration.user_id != user.id && !user.is_admin() {
            return Err(AppError::Forbidden("Not your registration".into()));
        }

        self.registration_repo.update_status(registration_id, registration::STATUS_CANCELLED).await
    }
}

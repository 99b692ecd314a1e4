use crate::domain::{models::registration::Registration, ports::RegistrationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

pub struct PostgresRegistrationRepo {
    pool: PgPool,
}

impl PostgresRegistrationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepo {
    async fn create(&self, registration: &Registration) -> Result<Registration, AppError> {
        sqlx::query_as::<_, Registration>(
            r#"INSERT INTO registrations (
                id, event_id, user_id, user_email, user_name, ticket_id,
                status, payment_status, check_in_time,
                feedback_rating, feedback_comment, feedback_submitted_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *"#
        )
            .bind(&registration.id)
            .bind(&registration.event_id)
            .bind(&registration.user_id)
            .bind(&registration.user_email)
            .bind(&registration.user_name)
            .bind(&registration.ticket_id)
            .bind(&registration.status)
            .bind(&registration.payment_status)
            .bind(registration.check_in_time)
            .bind(registration.feedback_rating)
            .bind(&registration.feedback_comment)
            .bind(registration.feedback_submitted_at)
            .bind(registration.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_ticket(&self, ticket_id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE ticket_id = $1")
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_event_and_user(&self, event_id: &str, user_id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = $1 AND user_id = $2 ORDER BY created_at DESC LIMIT 1"
        )
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_confirmed(&self, event_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS cnt FROM registrations WHERE event_id = $1 AND status = 'confirmed'"
        )
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row.get::<i64, _>("cnt"))
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = $1 ORDER BY created_at DESC"
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE user_id = $1 ORDER BY created_at DESC"
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: &str) -> Result<Registration, AppError> {
        sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET status = $1 WHERE id = $2 RETURNING *"
        )
            .bind(status)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_check_in(&self, id: &str, at: DateTime<Utc>) -> Result<Registration, AppError> {
        sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET check_in_time = $1, status = 'confirmed' WHERE id = $2 RETURNING *"
        )
            .bind(at)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_feedback(&self, id: &str, rating: i32, comment: Option<&str>, at: DateTime<Utc>) -> Result<Registration, AppError> {
        sqlx::query_as::<_, Registration>(
            r#"UPDATE registrations
               SET feedback_rating = $1, feedback_comment = $2, feedback_submitted_at = $3
               WHERE id = $4 RETURNING *"#
        )
            .bind(rating)
            .bind(comment)
            .bind(at)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

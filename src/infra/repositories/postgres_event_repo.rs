use crate::domain::{models::event::{Event, EventFilter}, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, start_date, end_date,
                is_virtual, virtual_link, address, city, state, country, postal_code,
                organizer_id, organizer_name, image_url, capacity, price, currency,
                category_id, category_name, category_color, tags,
                is_published, registration_deadline, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                      $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.start_date)
            .bind(event.end_date)
            .bind(event.is_virtual)
            .bind(&event.virtual_link)
            .bind(&event.address)
            .bind(&event.city)
            .bind(&event.state)
            .bind(&event.country)
            .bind(&event.postal_code)
            .bind(&event.organizer_id)
            .bind(&event.organizer_name)
            .bind(&event.image_url)
            .bind(event.capacity)
            .bind(event.price)
            .bind(&event.currency)
            .bind(&event.category_id)
            .bind(&event.category_name)
            .bind(&event.category_color)
            .bind(&event.tags)
            .bind(event.is_published)
            .bind(event.registration_deadline)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM events WHERE 1=1");

        if let Some(organizer_id) = &filter.organizer_id {
            qb.push(" AND organizer_id = ").push_bind(organizer_id);
        }
        if let Some(is_published) = filter.is_published {
            qb.push(" AND is_published = ").push_bind(is_published);
        }
        if let Some(from_date) = filter.from_date {
            qb.push(" AND start_date >= ").push_bind(from_date);
        }
        if let Some(category_id) = &filter.category_id {
            qb.push(" AND category_id = ").push_bind(category_id);
        }

        qb.push(" ORDER BY start_date ASC");

        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }

        qb.build_query_as::<Event>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title=$1, description=$2, start_date=$3, end_date=$4,
                is_virtual=$5, virtual_link=$6, address=$7, city=$8, state=$9, country=$10, postal_code=$11,
                image_url=$12, capacity=$13, price=$14, currency=$15,
                category_id=$16, category_name=$17, category_color=$18, tags=$19,
                is_published=$20, registration_deadline=$21, updated_at=$22
               WHERE id=$23 RETURNING *"#
        )
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.start_date)
            .bind(event.end_date)
            .bind(event.is_virtual)
            .bind(&event.virtual_link)
            .bind(&event.address)
            .bind(&event.city)
            .bind(&event.state)
            .bind(&event.country)
            .bind(&event.postal_code)
            .bind(&event.image_url)
            .bind(event.capacity)
            .bind(event.price)
            .bind(&event.currency)
            .bind(&event.category_id)
            .bind(&event.category_name)
            .bind(&event.category_color)
            .bind(&event.tags)
            .bind(event.is_published)
            .bind(event.registration_deadline)
            .bind(event.updated_at)
            .bind(&event.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }
}

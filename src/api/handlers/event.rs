use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::api::dtos::{
    requests::{CreateEventRequest, ListEventsQuery, UpdateEventRequest},
    responses::EventResponse,
};
use crate::domain::models::auth::SessionUser;
use crate::domain::models::event::{Event, EventFilter, NewEventParams};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

fn validate_location(is_virtual: bool, address: &Option<String>, city: &Option<String>, country: &Option<String>) -> Result<(), AppError> {
    if is_virtual {
        return Ok(());
    }
    let missing = address.as_deref().unwrap_or("").is_empty()
        || city.as_deref().unwrap_or("").is_empty()
        || country.as_deref().unwrap_or("").is_empty();
    if missing {
        return Err(AppError::Validation("Address, city and country are required for in-person events".into()));
    }
    Ok(())
}

fn can_edit(event: &Event, user: &SessionUser) -> bool {
    event.organizer_id == user.id || user.is_admin()
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !user.can_manage_events() {
        return Err(AppError::Forbidden("Only organizers can create events".into()));
    }

    if payload.capacity < 1 {
        return Err(AppError::Validation("Capacity must be at least 1".into()));
    }
    if payload.price < 0.0 {
        return Err(AppError::Validation("Price cannot be negative".into()));
    }
    if payload.end_date < payload.start_date {
        return Err(AppError::Validation("End date must be after start date".into()));
    }
    validate_location(payload.is_virtual, &payload.address, &payload.city, &payload.country)?;

    let event = Event::new(NewEventParams {
        title: payload.title,
        description: payload.description,
        start_date: payload.start_date,
        end_date: payload.end_date,
        is_virtual: payload.is_virtual,
        virtual_link: payload.virtual_link,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        country: payload.country,
        postal_code: payload.postal_code,
        organizer_id: user.id.clone(),
        organizer_name: user.display_name.clone(),
        image_url: payload.image_url,
        capacity: payload.capacity,
        price: payload.price,
        currency: payload.currency,
        category_id: payload.category_id,
        category_name: payload.category_name,
        category_color: payload.category_color,
        tags: payload.tags.unwrap_or_default(),
        is_published: payload.is_published.unwrap_or(false),
        registration_deadline: payload.registration_deadline,
    });

    let created = state.event_repo.create(&event).await?;
    info!("Event created: {} by organizer {}", created.id, user.id);

    Ok(Json(EventResponse::from(&created)))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(maybe_user): MaybeAuthUser,
    Query(query): Query<ListEventsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut filter = EventFilter {
        organizer_id: query.organizer_id,
        is_published: query.is_published,
        from_date: query.from_date,
        category_id: query.category_id,
        limit: query.limit,
    };

    // Guests never see drafts. Authenticated non-admins only see drafts when
    // listing their own events, mirroring the detail endpoint.
    let own_listing = maybe_user.as_ref().is_some_and(|u| {
        u.is_admin() || filter.organizer_id.as_deref() == Some(u.id.as_str())
    });
    if !own_listing {
        filter.is_published = Some(true);
    }

    let events = state.event_repo.list(&filter).await?;
    let response: Vec<EventResponse> = events.iter().map(EventResponse::from).collect();
    Ok(Json(response))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(maybe_user): MaybeAuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", event_id)))?;

    if !event.is_published {
        let visible = maybe_user.as_ref().is_some_and(|u| can_edit(&event, u));
        if !visible {
            return Err(AppError::NotFound(format!("Event '{}' not found", event_id)));
        }
    }

    Ok(Json(EventResponse::from(&event)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !can_edit(&event, &user) {
        return Err(AppError::Forbidden("Only the organizer can edit this event".into()));
    }

    if let Some(val) = payload.title { event.title = val; }
    if let Some(val) = payload.description { event.description = val; }
    if let Some(val) = payload.start_date { event.start_date = val; }
    if let Some(val) = payload.end_date { event.end_date = val; }
    if let Some(val) = payload.is_virtual { event.is_virtual = val; }
    if let Some(val) = payload.virtual_link { event.virtual_link = Some(val); }
    if let Some(val) = payload.address { event.address = Some(val); }
    if let Some(val) = payload.city { event.city = Some(val); }
    if let Some(val) = payload.state { event.state = Some(val); }
    if let Some(val) = payload.country { event.country = Some(val); }
    if let Some(val) = payload.postal_code { event.postal_code = Some(val); }
    if let Some(val) = payload.image_url { event.image_url = Some(val); }
    if let Some(val) = payload.capacity {
        if val < 1 {
            return Err(AppError::Validation("Capacity must be at least 1".into()));
        }
        event.capacity = val;
    }
    if let Some(val) = payload.price {
        if val < 0.0 {
            return Err(AppError::Validation("Price cannot be negative".into()));
        }
        event.price = val;
    }
    if let Some(val) = payload.currency { event.currency = val; }
    if let Some(val) = payload.category_id { event.category_id = val; }
    if let Some(val) = payload.category_name { event.category_name = val; }
    if let Some(val) = payload.category_color { event.category_color = val; }
    if let Some(val) = payload.tags {
        event.tags = serde_json::to_string(&val).map_err(|_| AppError::Validation("Invalid tags".into()))?;
    }
    if let Some(val) = payload.is_published { event.is_published = val; }
    if let Some(val) = payload.registration_deadline { event.registration_deadline = val; }

    if event.end_date < event.start_date {
        return Err(AppError::Validation("End date must be after start date".into()));
    }
    validate_location(event.is_virtual, &event.address, &event.city, &event.country)?;

    event.updated_at = Utc::now();

    let updated = state.event_repo.update(&event).await?;
    info!("Event updated: {}", updated.id);
    Ok(Json(EventResponse::from(&updated)))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !can_edit(&event, &user) {
        return Err(AppError::Forbidden("Only the organizer can delete this event".into()));
    }

    state.event_repo.delete(&event_id).await?;
    info!("Event deleted: {}", event_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

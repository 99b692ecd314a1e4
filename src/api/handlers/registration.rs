use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{requests::SubmitFeedbackRequest, responses::RegistrationResponse};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn register_for_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let registration = state.registration_service.register(&event_id, &user).await?;
    Ok(Json(RegistrationResponse::from(&registration)))
}

pub async fn list_event_registrations(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.organizer_id != user.id && !user.is_admin() {
        return Err(AppError::Forbidden("Only the organizer can list registrations".into()));
    }

    let registrations = state.registration_repo.list_by_event(&event_id).await?;
    let response: Vec<RegistrationResponse> = registrations.iter().map(RegistrationResponse::from).collect();
    Ok(Json(response))
}

pub async fn list_my_registrations(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let registrations = state.registration_repo.list_by_user(&user.id).await?;
    let response: Vec<RegistrationResponse> = registrations.iter().map(RegistrationResponse::from).collect();
    Ok(Json(response))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let registration = state.registration_repo.find_by_ticket(&ticket_id).await?
        .ok_or(AppError::NotFound("Ticket not found".into()))?;

    if registration.user_id != user.id && !user.is_admin() {
        return Err(AppError::Forbidden("Not your ticket".into()));
    }

    Ok(Json(RegistrationResponse::from(&registration)))
}

pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(registration_id): Path<String>,
    Json(payload): Json<SubmitFeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.registration_service
        .submit_feedback(&registration_id, &user, payload.rating, payload.comment.as_deref())
        .await?;

    info!("Feedback submitted for registration {}", registration_id);
    Ok(Json(RegistrationResponse::from(&updated)))
}

pub async fn check_in(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(registration_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let registration = state.registration_repo.find_by_id(&registration_id).await?
        .ok_or(AppError::NotFound("Registration not found".into()))?;

    let event = state.event_repo.find_by_id(&registration.event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.organizer_id != user.id && !user.is_admin() {
        return Err(AppError::Forbidden("Only the organizer can check in attendees".into()));
    }

    let updated = state.registration_service.check_in(&registration_id).await?;
    Ok(Json(RegistrationResponse::from(&updated)))
}

pub async fn cancel_registration(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(registration_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.registration_service.cancel(&registration_id, &user).await?;
    info!("Registration cancelled: {}", registration_id);
    Ok(Json(RegistrationResponse::from(&updated)))
}

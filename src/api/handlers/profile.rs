use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::UpdateProfileRequest;
use crate::domain::models::auth::UserProfile;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&session.id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(UserProfile {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        role: user.role,
        photo_url: user.photo_url,
    }))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&session.id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let display_name = payload.display_name.unwrap_or(user.display_name);
    if display_name.trim().is_empty() {
        return Err(AppError::Validation("Display name cannot be empty".into()));
    }
    let photo_url = match payload.photo_url {
        Some(value) => value,
        None => user.photo_url,
    };

    let updated = state.user_repo
        .update_profile(&session.id, &display_name, photo_url.as_deref())
        .await?;

    info!("Profile updated for user {}", updated.id);

    Ok(Json(UserProfile {
        id: updated.id,
        email: updated.email,
        display_name: updated.display_name,
        role: updated.role,
        photo_url: updated.photo_url,
    }))
}

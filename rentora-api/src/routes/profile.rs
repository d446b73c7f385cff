/// Own-profile endpoints
///
/// # Endpoints
///
/// - `GET /v1/profile` - Fetch the caller's profile
/// - `PUT /v1/profile` - Update display name / phone
///
/// The profile's `role` field in these responses is the display projection;
/// clients needing an authoritative answer get it implicitly from the route
/// guards.

use crate::{app::AppState, error::{ApiError, ApiResult}};
use axum::{extract::State, Json};
use rentora_shared::auth::session::SessionContext;
use rentora_shared::models::profile::{Profile, UpdateProfile};
use serde::Deserialize;
use validator::Validate;

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub full_name: Option<String>,

    /// New contact phone
    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,
}

/// Fetches the caller's profile
pub async fn get_profile(
    session: SessionContext,
    State(state): State<AppState>,
) -> ApiResult<Json<Profile>> {
    let profile = Profile::find_by_user(&state.db, session.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// Updates the caller's display fields
pub async fn update_profile(
    session: SessionContext,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Profile>> {
    req.validate()?;

    let profile = Profile::update(
        &state.db,
        session.user_id,
        UpdateProfile {
            full_name: req.full_name,
            phone: req.phone,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

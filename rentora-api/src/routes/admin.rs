/// Admin moderation endpoints
///
/// # Endpoints
///
/// - `GET /v1/admin/users?role=` - List users holding a role
/// - `POST /v1/admin/users/:id/role` - Assign a role
/// - `POST /v1/admin/users/:id/suspend` - Suspend an account
/// - `POST /v1/admin/users/:id/reinstate` - Reinstate an account
/// - `POST /v1/admin/properties/:id/unlist` - Unlist any property
///
/// Role assignment reports the advisory transition verdict in its response
/// rather than enforcing it: the self-service table says a renter cannot
/// become a landlord on their own, but an admin doing exactly that is the
/// normal promotion flow. The denormalized profile role and the role table
/// are updated together by the shared assignment transaction.

use crate::{app::AppState, error::{ApiError, ApiResult}};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use rentora_shared::models::profile::{Profile, ProfileStatus};
use rentora_shared::models::property::{Property, PropertyStatus};
use rentora_shared::models::role::Role;
use rentora_shared::roles::assignment::{
    assign_role, users_with_role, validate_role_transition, RoleMember,
};
use rentora_shared::roles::resolver::RoleSet;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Users-by-role query
#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    /// Role to list
    pub role: Role,
}

/// Role assignment request
#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    /// Role to assign
    pub role: Role,
}

/// Role assignment response
#[derive(Debug, Serialize)]
pub struct AssignRoleResponse {
    /// User whose role changed
    pub user_id: Uuid,

    /// Newly assigned role
    pub role: Role,

    /// Advisory verdict from the self-service transition table
    pub transition_allowed: bool,
}

/// Lists users holding a role
pub async fn list_users_by_role(
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> ApiResult<Json<Vec<RoleMember>>> {
    let members = users_with_role(&state.db, query.role).await?;

    Ok(Json(members))
}

/// Assigns a role to a user
///
/// # Errors
///
/// - `404 Not Found`: user has no profile
/// - `500 Internal Server Error`: role sync failure (rolled back)
pub async fn assign_user_role(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<AssignRoleRequest>,
) -> ApiResult<Json<AssignRoleResponse>> {
    // Advisory only; defaults to renter for users holding no roles yet
    let current = RoleSet::load_or_empty(&state.db, user_id)
        .await
        .primary_role_or_default();
    let transition_allowed = validate_role_transition(current, req.role);

    if !transition_allowed {
        warn!(
            %user_id,
            from = %current,
            to = %req.role,
            "Admin override of self-service role transition rules"
        );
    }

    assign_role(&state.db, user_id, req.role).await?;

    Ok(Json(AssignRoleResponse {
        user_id,
        role: req.role,
        transition_allowed,
    }))
}

/// Suspends an account (soft status flip; data stays in place)
pub async fn suspend_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Profile>> {
    let profile = Profile::set_status(&state.db, user_id, ProfileStatus::Suspended)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// Reinstates a suspended account
pub async fn reinstate_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Profile>> {
    let profile = Profile::set_status(&state.db, user_id, ProfileStatus::Active)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// Unlists any property (moderation)
pub async fn unlist_property(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
) -> ApiResult<Json<Property>> {
    let property = Property::set_status(&state.db, property_id, PropertyStatus::Unlisted)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    Ok(Json(property))
}

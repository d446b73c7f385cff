/// Application lifecycle endpoints
///
/// # Endpoints
///
/// - `POST /v1/properties/:id/applications` - Apply to a listing (renter)
/// - `GET /v1/applications` - Own view of the table (renter and/or landlord)
/// - `POST /v1/applications/:id/withdraw` - Withdraw own application (renter)
/// - `POST /v1/applications/:id/decide` - Approve or decline (landlord)

use crate::{app::AppState, error::{ApiError, ApiResult}};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rentora_shared::auth::authorization::require_ownership;
use rentora_shared::auth::session::SessionContext;
use rentora_shared::models::application::{
    Application, ApplicationStatus, CreateApplication,
};
use rentora_shared::models::property::{Property, PropertyStatus};
use rentora_shared::models::role::Role;
use rentora_shared::roles::resolver::RoleSet;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Apply request
#[derive(Debug, Deserialize, Validate)]
pub struct ApplyRequest {
    /// Cover message to the landlord
    #[validate(length(max = 2000, message = "Cover message must be at most 2000 characters"))]
    pub cover_message: Option<String>,
}

/// Landlord's decision on a pending application
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Accept the application
    Approve,

    /// Reject the application
    Decline,
}

/// Decide request
#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    /// approve or decline
    pub decision: Decision,
}

/// Submits an application to a listed property
pub async fn apply(
    session: SessionContext,
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> ApiResult<Json<Application>> {
    req.validate()?;

    let property = Property::find_by_id(&state.db, property_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    if property.status != PropertyStatus::Listed {
        return Err(ApiError::Conflict(
            "Property is not accepting applications".to_string(),
        ));
    }

    if property.landlord_id == session.user_id {
        return Err(ApiError::BadRequest(
            "Cannot apply to your own property".to_string(),
        ));
    }

    // The partial unique index turns a duplicate live application into a 409
    let application = Application::create(
        &state.db,
        CreateApplication {
            property_id,
            renter_id: session.user_id,
            cover_message: req.cover_message.unwrap_or_default(),
        },
    )
    .await?;

    Ok(Json(application))
}

/// Lists the caller's view of the applications table
///
/// Renters see their own applications; landlords see applications against
/// their properties; a caller holding both roles sees both, concatenated.
pub async fn list_applications(
    session: SessionContext,
    Extension(roles): Extension<RoleSet>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Application>>> {
    let mut applications = Vec::new();

    if roles.has_role(Role::Landlord) {
        applications.extend(Application::list_for_landlord(&state.db, session.user_id).await?);
    }

    if roles.has_role(Role::Renter) {
        applications.extend(Application::list_by_renter(&state.db, session.user_id).await?);
    }

    Ok(Json(applications))
}

/// Withdraws the caller's own live application
pub async fn withdraw(
    session: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Application>> {
    let application = Application::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    require_ownership(session.user_id, application.renter_id)?;

    if !application.status.is_live() {
        return Err(ApiError::Conflict(format!(
            "Cannot withdraw a {} application",
            application.status.as_str()
        )));
    }

    let application = Application::set_status(&state.db, id, ApplicationStatus::Withdrawn)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    Ok(Json(application))
}

/// Approves or declines a pending application on the caller's property
pub async fn decide_application(
    session: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DecideRequest>,
) -> ApiResult<Json<Application>> {
    let application = Application::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    let property = Property::find_by_id(&state.db, application.property_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    require_ownership(session.user_id, property.landlord_id)?;

    if application.status != ApplicationStatus::Pending {
        return Err(ApiError::Conflict(format!(
            "Application is already {}",
            application.status.as_str()
        )));
    }

    let new_status = match req.decision {
        Decision::Approve => ApplicationStatus::Approved,
        Decision::Decline => ApplicationStatus::Declined,
    };

    let application = Application::set_status(&state.db, id, new_status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    Ok(Json(application))
}

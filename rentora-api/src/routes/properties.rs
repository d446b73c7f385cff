/// Property listing endpoints
///
/// # Endpoints
///
/// - `GET /v1/properties` - Public browse with filters (listed only)
/// - `GET /v1/properties/:id` - Public fetch (listed only)
/// - `POST /v1/properties` - Create listing (landlord)
/// - `PUT /v1/properties/:id` - Update own listing (landlord)
/// - `POST /v1/properties/:id/unlist` - Unlist own listing (landlord)
/// - `GET /v1/my/properties` - Own listings, any status (landlord)

use crate::{app::AppState, error::{ApiError, ApiResult}};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use rentora_shared::auth::authorization::require_ownership;
use rentora_shared::auth::session::SessionContext;
use rentora_shared::models::property::{
    BrowseFilter, CreateProperty, Property, PropertyStatus, UpdateProperty,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Browse query parameters
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    /// Exact city match (case-insensitive)
    pub city: Option<String>,

    /// Maximum monthly rent in cents
    pub max_rent_cents: Option<i64>,

    /// Minimum number of bedrooms
    pub min_bedrooms: Option<i16>,

    /// Page size (default 20, max 100)
    pub limit: Option<i64>,

    /// Page offset
    pub offset: Option<i64>,
}

/// Create listing request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    /// Listing headline
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Free-form description
    #[validate(length(max = 10000, message = "Description must be at most 10000 characters"))]
    pub description: Option<String>,

    /// Street address
    #[validate(length(min = 1, max = 512, message = "Address must be 1-512 characters"))]
    pub address: String,

    /// City
    #[validate(length(min = 1, max = 128, message = "City must be 1-128 characters"))]
    pub city: String,

    /// Monthly rent in cents
    #[validate(range(min = 0, message = "Rent cannot be negative"))]
    pub rent_cents: i64,

    /// Number of bedrooms
    #[validate(range(min = 0, max = 50, message = "Bedrooms must be 0-50"))]
    pub bedrooms: i16,

    /// Number of bathrooms
    #[validate(range(min = 0, max = 50, message = "Bathrooms must be 0-50"))]
    pub bathrooms: i16,
}

/// Update listing request; None fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePropertyRequest {
    /// New headline
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    #[validate(length(max = 10000, message = "Description must be at most 10000 characters"))]
    pub description: Option<String>,

    /// New street address
    #[validate(length(min = 1, max = 512, message = "Address must be 1-512 characters"))]
    pub address: Option<String>,

    /// New city
    #[validate(length(min = 1, max = 128, message = "City must be 1-128 characters"))]
    pub city: Option<String>,

    /// New monthly rent in cents
    #[validate(range(min = 0, message = "Rent cannot be negative"))]
    pub rent_cents: Option<i64>,

    /// New bedroom count
    #[validate(range(min = 0, max = 50, message = "Bedrooms must be 0-50"))]
    pub bedrooms: Option<i16>,

    /// New bathroom count
    #[validate(range(min = 0, max = 50, message = "Bathrooms must be 0-50"))]
    pub bathrooms: Option<i16>,
}

/// Public browse over listed properties
pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> ApiResult<Json<Vec<Property>>> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let filter = BrowseFilter {
        city: query.city,
        max_rent_cents: query.max_rent_cents,
        min_bedrooms: query.min_bedrooms,
    };

    let properties = Property::browse(&state.db, &filter, limit, offset).await?;

    Ok(Json(properties))
}

/// Public fetch of a single listed property
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Property>> {
    let property = Property::find_by_id(&state.db, id)
        .await?
        .filter(|p| p.status == PropertyStatus::Listed)
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    Ok(Json(property))
}

/// Creates a listing owned by the calling landlord
pub async fn create_property(
    session: SessionContext,
    State(state): State<AppState>,
    Json(req): Json<CreatePropertyRequest>,
) -> ApiResult<Json<Property>> {
    req.validate()?;

    let property = Property::create(
        &state.db,
        CreateProperty {
            landlord_id: session.user_id,
            title: req.title,
            description: req.description.unwrap_or_default(),
            address: req.address,
            city: req.city,
            rent_cents: req.rent_cents,
            bedrooms: req.bedrooms,
            bathrooms: req.bathrooms,
        },
    )
    .await?;

    Ok(Json(property))
}

/// Updates a listing the caller owns
pub async fn update_property(
    session: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePropertyRequest>,
) -> ApiResult<Json<Property>> {
    req.validate()?;

    let existing = Property::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    require_ownership(session.user_id, existing.landlord_id)?;

    let property = Property::update(
        &state.db,
        id,
        UpdateProperty {
            title: req.title,
            description: req.description,
            address: req.address,
            city: req.city,
            rent_cents: req.rent_cents,
            bedrooms: req.bedrooms,
            bathrooms: req.bathrooms,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    Ok(Json(property))
}

/// Unlists a listing the caller owns
pub async fn unlist_property(
    session: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Property>> {
    let existing = Property::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    require_ownership(session.user_id, existing.landlord_id)?;

    let property = Property::set_status(&state.db, id, PropertyStatus::Unlisted)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    Ok(Json(property))
}

/// Lists the caller's own properties, any status
pub async fn my_properties(
    session: SessionContext,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Property>>> {
    let properties = Property::list_by_landlord(&state.db, session.user_id).await?;

    Ok(Json(properties))
}

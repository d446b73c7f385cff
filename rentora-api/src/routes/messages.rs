/// Direct message endpoints
///
/// # Endpoints
///
/// - `POST /v1/messages` - Send a message
/// - `GET /v1/messages/with/:user_id` - Conversation with another user
/// - `POST /v1/messages/:id/read` - Mark a received message read

use crate::{app::AppState, error::{ApiError, ApiResult}};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use rentora_shared::auth::authorization::require_ownership;
use rentora_shared::auth::session::SessionContext;
use rentora_shared::models::message::{CreateMessage, Message};
use rentora_shared::models::property::Property;
use rentora_shared::models::user::User;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Send message request
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Receiving user
    pub recipient_id: Uuid,

    /// Listing the message is about, if any
    pub property_id: Option<Uuid>,

    /// Message body
    #[validate(length(min = 1, max = 4000, message = "Body must be 1-4000 characters"))]
    pub body: String,
}

/// Conversation paging parameters
#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    /// Page size (default 50, max 200)
    pub limit: Option<i64>,

    /// Page offset
    pub offset: Option<i64>,
}

/// Sends a message to another user
pub async fn send_message(
    session: SessionContext,
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Json<Message>> {
    req.validate()?;

    if req.recipient_id == session.user_id {
        return Err(ApiError::BadRequest(
            "Cannot message yourself".to_string(),
        ));
    }

    User::find_by_id(&state.db, req.recipient_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipient not found".to_string()))?;

    if let Some(property_id) = req.property_id {
        Property::find_by_id(&state.db, property_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;
    }

    let message = Message::create(
        &state.db,
        CreateMessage {
            sender_id: session.user_id,
            recipient_id: req.recipient_id,
            property_id: req.property_id,
            body: req.body,
        },
    )
    .await?;

    Ok(Json(message))
}

/// Lists the conversation between the caller and another user
pub async fn conversation(
    session: SessionContext,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ConversationQuery>,
) -> ApiResult<Json<Vec<Message>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let messages =
        Message::conversation(&state.db, session.user_id, user_id, limit, offset).await?;

    Ok(Json(messages))
}

/// Marks a message the caller received as read
pub async fn mark_read(
    session: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Message>> {
    let message = Message::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;

    // Only the recipient can mark a message read
    require_ownership(session.user_id, message.recipient_id)?;

    let message = Message::mark_read(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;

    Ok(Json(message))
}

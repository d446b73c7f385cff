/// Message model and database operations
///
/// Direct messages between two users, optionally attached to a property
/// (a renter asking about a listing). Read state is a timestamp set when the
/// recipient marks the message read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A direct message
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    /// Unique message ID
    pub id: Uuid,

    /// Sending user
    pub sender_id: Uuid,

    /// Receiving user
    pub recipient_id: Uuid,

    /// Listing the conversation is about, if any
    pub property_id: Option<Uuid>,

    /// Message body
    pub body: String,

    /// When the recipient marked the message read (None = unread)
    pub read_at: Option<DateTime<Utc>>,

    /// When the message was sent
    pub created_at: DateTime<Utc>,
}

/// Input for sending a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessage {
    /// Sending user
    pub sender_id: Uuid,

    /// Receiving user
    pub recipient_id: Uuid,

    /// Listing the message is about, if any
    pub property_id: Option<Uuid>,

    /// Message body
    pub body: String,
}

impl Message {
    /// Sends a message
    ///
    /// # Errors
    ///
    /// Returns an error if sender, recipient, or property doesn't exist
    /// (foreign key violation) or database connection fails
    pub async fn create(pool: &PgPool, data: CreateMessage) -> Result<Self, sqlx::Error> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (sender_id, recipient_id, property_id, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sender_id, recipient_id, property_id, body, read_at, created_at
            "#,
        )
        .bind(data.sender_id)
        .bind(data.recipient_id)
        .bind(data.property_id)
        .bind(data.body)
        .fetch_one(pool)
        .await?;

        Ok(message)
    }

    /// Finds a message by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, recipient_id, property_id, body, read_at, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(message)
    }

    /// Lists the conversation between two users, oldest first
    ///
    /// Returns messages in both directions between the pair, paginated.
    pub async fn conversation(
        pool: &PgPool,
        user_a: Uuid,
        user_b: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, recipient_id, property_id, body, read_at, created_at
            FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY created_at ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    /// Marks a message read
    ///
    /// Only has effect the first time; the original read timestamp is kept on
    /// repeat calls. Caller enforces that only the recipient may mark read.
    ///
    /// # Returns
    ///
    /// The updated message if found, None otherwise
    pub async fn mark_read(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            UPDATE messages
            SET read_at = COALESCE(read_at, NOW())
            WHERE id = $1
            RETURNING id, sender_id, recipient_id, property_id, body, read_at, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(message)
    }
}

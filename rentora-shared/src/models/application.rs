/// Application model and database operations
///
/// A renter's application against a property listing. A partial unique index
/// guarantees at most one live (pending or approved) application per renter
/// per property; withdrawn and declined applications stay behind as history.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE application_status AS ENUM ('pending', 'approved', 'declined', 'withdrawn');
///
/// CREATE TABLE applications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     property_id UUID NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
///     renter_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     cover_message TEXT NOT NULL DEFAULT '',
///     status application_status NOT NULL DEFAULT 'pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Application lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Awaiting the landlord's decision
    Pending,

    /// Accepted by the landlord
    Approved,

    /// Rejected by the landlord
    Declined,

    /// Withdrawn by the renter
    Withdrawn,
}

impl ApplicationStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Declined => "declined",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Whether the application still occupies the one-live-per-property slot
    pub fn is_live(&self) -> bool {
        matches!(self, ApplicationStatus::Pending | ApplicationStatus::Approved)
    }
}

/// A renter's application to one property
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Application {
    /// Unique application ID
    pub id: Uuid,

    /// Target property
    pub property_id: Uuid,

    /// Applying renter's user ID
    pub renter_id: Uuid,

    /// Renter's cover message to the landlord
    pub cover_message: String,

    /// Lifecycle state
    pub status: ApplicationStatus,

    /// When the application was submitted
    pub created_at: DateTime<Utc>,

    /// When the application was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for submitting an application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplication {
    /// Target property
    pub property_id: Uuid,

    /// Applying renter's user ID
    pub renter_id: Uuid,

    /// Cover message to the landlord
    pub cover_message: String,
}

impl Application {
    /// Submits an application
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A live application already exists for this renter and property
    ///   (unique index violation)
    /// - The property or renter doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateApplication) -> Result<Self, sqlx::Error> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (property_id, renter_id, cover_message)
            VALUES ($1, $2, $3)
            RETURNING id, property_id, renter_id, cover_message, status, created_at, updated_at
            "#,
        )
        .bind(data.property_id)
        .bind(data.renter_id)
        .bind(data.cover_message)
        .fetch_one(pool)
        .await?;

        Ok(application)
    }

    /// Finds an application by ID
    ///
    /// # Returns
    ///
    /// The application if found, None otherwise
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, property_id, renter_id, cover_message, status, created_at, updated_at
            FROM applications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(application)
    }

    /// Lists a renter's own applications, newest first
    pub async fn list_by_renter(pool: &PgPool, renter_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, property_id, renter_id, cover_message, status, created_at, updated_at
            FROM applications
            WHERE renter_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(renter_id)
        .fetch_all(pool)
        .await?;

        Ok(applications)
    }

    /// Lists applications across all of a landlord's properties, newest first
    pub async fn list_for_landlord(
        pool: &PgPool,
        landlord_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT a.id, a.property_id, a.renter_id, a.cover_message, a.status,
                   a.created_at, a.updated_at
            FROM applications a
            JOIN properties p ON p.id = a.property_id
            WHERE p.landlord_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(landlord_id)
        .fetch_all(pool)
        .await?;

        Ok(applications)
    }

    /// Sets an application's lifecycle state
    ///
    /// Business rules (who may decide, who may withdraw, which transitions
    /// are legal) are enforced by the caller.
    ///
    /// # Returns
    ///
    /// The updated application if found, None otherwise
    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, property_id, renter_id, cover_message, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_status_as_str() {
        assert_eq!(ApplicationStatus::Pending.as_str(), "pending");
        assert_eq!(ApplicationStatus::Approved.as_str(), "approved");
        assert_eq!(ApplicationStatus::Declined.as_str(), "declined");
        assert_eq!(ApplicationStatus::Withdrawn.as_str(), "withdrawn");
    }

    #[test]
    fn test_live_states() {
        assert!(ApplicationStatus::Pending.is_live());
        assert!(ApplicationStatus::Approved.is_live());
        assert!(!ApplicationStatus::Declined.is_live());
        assert!(!ApplicationStatus::Withdrawn.is_live());
    }
}

/// Profile model and database operations
///
/// One profile row per user, created at signup. Carries the account-facing
/// fields plus two pieces of authorization-adjacent state:
///
/// - `role`: a denormalized projection of the authoritative `user_roles`
///   table, written only inside the role-assignment transaction (and at
///   signup). Display-only; permission checks never read it.
/// - `status`: soft moderation state. Profiles are never hard-deleted in the
///   normal flow; suspension flips this field instead.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE profiles (
///     user_id UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
///     full_name VARCHAR(255),
///     phone VARCHAR(32),
///     role user_role,
///     status profile_status NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::role::Role;

/// Soft moderation state for a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "profile_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    /// Normal account
    Active,

    /// Suspended by an admin; sign-in is refused
    Suspended,
}

impl ProfileStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::Active => "active",
            ProfileStatus::Suspended => "suspended",
        }
    }
}

/// Account-facing profile for one user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    /// Owning user ID
    pub user_id: Uuid,

    /// Display name
    pub full_name: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,

    /// Denormalized role projection (display-only, see module docs)
    pub role: Option<Role>,

    /// Soft moderation state
    pub status: ProfileStatus,

    /// When the profile was created
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    /// Owning user ID
    pub user_id: Uuid,

    /// Display name
    pub full_name: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,

    /// Initial role projection (matches the seeded user_roles row)
    pub role: Option<Role>,
}

/// Input for updating a profile; None fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    /// New display name
    pub full_name: Option<String>,

    /// New contact phone number
    pub phone: Option<String>,
}

impl Profile {
    /// Creates a profile row
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A profile already exists for the user (primary key violation)
    /// - The user doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateProfile) -> Result<Self, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, full_name, phone, role)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, full_name, phone, role, status, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.full_name)
        .bind(data.phone)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(profile)
    }

    /// Finds the profile for a user
    ///
    /// # Returns
    ///
    /// The profile if found, None otherwise
    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, full_name, phone, role, status, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Updates the account-facing fields of a profile
    ///
    /// Fields left as None keep their current value.
    ///
    /// # Returns
    ///
    /// The updated profile if found, None if no profile exists for the user
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        data: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING user_id, full_name, phone, role, status, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(data.full_name)
        .bind(data.phone)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Sets the soft moderation status
    ///
    /// Used by admin suspend/reinstate. Suspension leaves the row (and all
    /// the user's data) in place.
    ///
    /// # Returns
    ///
    /// The updated profile if found, None if no profile exists for the user
    pub async fn set_status(
        pool: &PgPool,
        user_id: Uuid,
        status: ProfileStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET status = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING user_id, full_name, phone, role, status, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_status_as_str() {
        assert_eq!(ProfileStatus::Active.as_str(), "active");
        assert_eq!(ProfileStatus::Suspended.as_str(), "suspended");
    }

    #[test]
    fn test_update_profile_default() {
        let update = UpdateProfile::default();
        assert!(update.full_name.is_none());
        assert!(update.phone.is_none());
    }
}

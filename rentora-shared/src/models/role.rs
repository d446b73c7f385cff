/// Role enumeration and the authoritative role store
///
/// A user's effective roles live in the `user_roles` table, zero or more rows
/// per user. The single `profiles.role` column is a display projection of the
/// same data and is never consulted for permission checks.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'landlord', 'renter');
///
/// CREATE TABLE user_roles (
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role user_role NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (user_id, role)
/// );
/// ```
///
/// # Roles
///
/// - **admin**: moderates users and listings
/// - **landlord**: creates and manages property listings
/// - **renter**: browses, applies, and messages
///
/// The priority order (admin > landlord > renter) exists only to pick a
/// default landing page after a denied navigation. It is not a permission
/// hierarchy: holding admin does not imply landlord.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Closed role enumeration for the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Moderates users and listings
    Admin,

    /// Lists and manages properties
    Landlord,

    /// Browses listings, applies, and messages landlords
    Renter,
}

/// All roles, in priority order (highest first)
pub const ALL_ROLES: [Role; 3] = [Role::Admin, Role::Landlord, Role::Renter];

impl Role {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Landlord => "landlord",
            Role::Renter => "renter",
        }
    }

    /// Numeric priority used only for redirect-target selection
    ///
    /// admin > landlord > renter. Never used for permission checks.
    pub(crate) fn priority(&self) -> u8 {
        match self {
            Role::Admin => 3,
            Role::Landlord => 2,
            Role::Renter => 1,
        }
    }

    /// Default landing page for a user whose primary role is this one
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Landlord => "/landlord",
            Role::Renter => "/",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the authoritative role store
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRole {
    /// User ID
    pub user_id: Uuid,

    /// Granted role
    pub role: Role,

    /// When the role was granted
    pub created_at: DateTime<Utc>,
}

impl UserRole {
    /// Loads all roles granted to a user
    ///
    /// Reads only the authoritative `user_roles` table. Returns an empty
    /// vector for users with no role rows, including users whose profile
    /// still carries a stale denormalized role.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use rentora_shared::models::role::UserRole;
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    /// let roles = UserRole::roles_for_user(&pool, user_id).await?;
    /// println!("User holds {} role(s)", roles.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn roles_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Role>, sqlx::Error> {
        let roles: Vec<Role> = sqlx::query_scalar(
            r#"
            SELECT role FROM user_roles
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(roles)
    }

    /// Grants a role to a user
    ///
    /// Idempotent: granting an already-held role is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the user doesn't exist (foreign key violation) or
    /// database connection fails
    pub async fn grant(pool: &PgPool, user_id: Uuid, role: Role) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Revokes every role held by a user
    ///
    /// # Returns
    ///
    /// Number of role rows removed
    pub async fn revoke_all(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Counts role rows held by a user
    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::Landlord.as_str(), "landlord");
        assert_eq!(Role::Renter.as_str(), "renter");
    }

    #[test]
    fn test_role_priority_order() {
        assert!(Role::Admin.priority() > Role::Landlord.priority());
        assert!(Role::Landlord.priority() > Role::Renter.priority());
    }

    #[test]
    fn test_landing_paths() {
        assert_eq!(Role::Admin.landing_path(), "/admin");
        assert_eq!(Role::Landlord.landing_path(), "/landlord");
        assert_eq!(Role::Renter.landing_path(), "/");
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Landlord).unwrap(), "\"landlord\"");
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }
}

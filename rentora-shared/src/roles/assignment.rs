/// Role assignment
///
/// Changes a user's role while keeping the two role stores consistent: the
/// authoritative `user_roles` table and the denormalized `profiles.role`
/// projection are written inside a single transaction, so a mid-sequence
/// failure rolls back rather than leaving the stores disagreeing.
///
/// The transition table in [`validate_role_transition`] is advisory: it
/// describes which changes a user may request for themselves. Admin-driven
/// assignment deliberately bypasses it (an admin must be able to promote a
/// renter to landlord), so [`assign_role`] does not consult it — callers
/// surface the verdict to the operator instead.
///
/// # Example
///
/// ```no_run
/// use rentora_shared::models::role::Role;
/// use rentora_shared::roles::assignment::{assign_role, validate_role_transition};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// // Advisory check, shown to the operator but not enforced here
/// let self_service = validate_role_transition(Role::Renter, Role::Landlord);
/// assert!(!self_service);
///
/// assign_role(&pool, user_id, Role::Landlord).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::profile::ProfileStatus;
use crate::models::role::Role;

/// Error type for role assignment
#[derive(Debug, thiserror::Error)]
pub enum RoleSyncError {
    /// No profile row exists for the user
    #[error("No profile exists for user {0}")]
    UnknownUser(Uuid),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Assigns a single role to a user, replacing whatever they held
///
/// Inside one transaction:
///
/// 1. delete all existing `user_roles` rows for the user
/// 2. update the profile's denormalized `role` field
/// 3. insert the single new role row
///
/// If any step fails the transaction rolls back and both stores keep their
/// previous state. Repeating the call is idempotent: the user ends with
/// exactly one row for the assigned role.
///
/// # Errors
///
/// Returns `RoleSyncError::UnknownUser` if the user has no profile, or
/// `RoleSyncError::Database` if any statement fails.
pub async fn assign_role(pool: &PgPool, user_id: Uuid, new_role: Role) -> Result<(), RoleSyncError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let updated = sqlx::query(
        r#"
        UPDATE profiles
        SET role = $2, updated_at = NOW()
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(new_role)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        // Dropping the transaction rolls back the delete above.
        return Err(RoleSyncError::UnknownUser(user_id));
    }

    sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
        .bind(user_id)
        .bind(new_role)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(%user_id, role = %new_role, "Assigned role");
    Ok(())
}

/// Advisory check of the self-service role transition table
///
/// - admin may become anything
/// - landlord may become landlord or renter
/// - renter may only remain renter
///
/// Advisory only: nothing in [`assign_role`] enforces it. Admin endpoints
/// report the verdict alongside the result so operators can see when they
/// are overriding the self-service rules.
pub fn validate_role_transition(current: Role, new: Role) -> bool {
    match current {
        Role::Admin => true,
        Role::Landlord => matches!(new, Role::Landlord | Role::Renter),
        Role::Renter => new == Role::Renter,
    }
}

/// One row of the users-by-role listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoleMember {
    /// User ID
    pub user_id: Uuid,

    /// Email address
    pub email: String,

    /// Display name from the profile
    pub full_name: Option<String>,

    /// Profile moderation state
    pub status: ProfileStatus,

    /// When the role was granted
    pub granted_at: DateTime<Utc>,
}

/// Lists all users holding a role, for display
///
/// Read-only join of the authoritative role table to identity and profile
/// records, oldest grant first.
///
/// # Errors
///
/// Returns an error if database connection fails
pub async fn users_with_role(pool: &PgPool, role: Role) -> Result<Vec<RoleMember>, sqlx::Error> {
    let members = sqlx::query_as::<_, RoleMember>(
        r#"
        SELECT ur.user_id, u.email, p.full_name, p.status, ur.created_at AS granted_at
        FROM user_roles ur
        JOIN users u ON u.id = ur.user_id
        JOIN profiles p ON p.user_id = ur.user_id
        WHERE ur.role = $1
        ORDER BY ur.created_at ASC
        "#,
    )
    .bind(role)
    .fetch_all(pool)
    .await?;

    Ok(members)
}

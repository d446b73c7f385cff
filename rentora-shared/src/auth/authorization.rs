/// Authorization helpers and permission checks
///
/// Handler-level checks that run after the route guard: a role floor for a
/// specific operation, and resource ownership. Both fail closed — a failed
/// role load reads as "no roles" and denies.
///
/// # Example
///
/// ```no_run
/// use rentora_shared::auth::authorization::{require_ownership, require_role};
/// use rentora_shared::models::role::Role;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// async fn unlist_listing(
///     pool: &PgPool,
///     caller: Uuid,
///     landlord_id: Uuid,
/// ) -> Result<(), String> {
///     // Caller must be a landlord and must own this listing
///     require_role(pool, caller, Role::Landlord).await.map_err(|e| e.to_string())?;
///     require_ownership(caller, landlord_id).map_err(|e| e.to_string())?;
///     Ok(())
/// }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::role::Role;
use crate::roles::resolver::RoleSet;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// User holds no roles at all
    #[error("User holds no roles")]
    NoRoles,

    /// User doesn't hold the required role
    #[error("Insufficient permissions: requires {required:?}, has {actual:?}")]
    InsufficientRole {
        required: Role,
        actual: Option<Role>,
    },

    /// User doesn't own the resource
    #[error("Not authorized to access this resource")]
    NotAuthorized,
}

/// Checks that a user holds a specific role
///
/// Loads the role set from the authoritative store, failing closed: a failed
/// load denies with `NoRoles` rather than erroring.
///
/// # Errors
///
/// Returns `AuthzError::NoRoles` if the user has no role rows (or the load
/// failed), `AuthzError::InsufficientRole` if the role isn't held.
pub async fn require_role(pool: &PgPool, user_id: Uuid, required: Role) -> Result<(), AuthzError> {
    let roles = RoleSet::load_or_empty(pool, user_id).await;
    require_role_in(&roles, required)
}

/// Checks a role floor against an already-loaded role set
pub fn require_role_in(roles: &RoleSet, required: Role) -> Result<(), AuthzError> {
    if roles.is_empty() {
        return Err(AuthzError::NoRoles);
    }

    if !roles.has_role(required) {
        return Err(AuthzError::InsufficientRole {
            required,
            actual: roles.primary_role(),
        });
    }

    Ok(())
}

/// Checks that the caller owns a resource
///
/// Verifies the resource's owner id matches the authenticated user.
///
/// # Errors
///
/// Returns `AuthzError::NotAuthorized` if the caller is not the owner
pub fn require_ownership(caller: Uuid, resource_owner_id: Uuid) -> Result<(), AuthzError> {
    if caller != resource_owner_id {
        return Err(AuthzError::NotAuthorized);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role_in_empty_set() {
        let result = require_role_in(&RoleSet::empty(), Role::Admin);
        assert!(matches!(result, Err(AuthzError::NoRoles)));
    }

    #[test]
    fn test_require_role_in_insufficient() {
        let roles = RoleSet::new(vec![Role::Renter]);
        match require_role_in(&roles, Role::Landlord) {
            Err(AuthzError::InsufficientRole { required, actual }) => {
                assert_eq!(required, Role::Landlord);
                assert_eq!(actual, Some(Role::Renter));
            }
            other => panic!("Expected InsufficientRole, got {:?}", other),
        }
    }

    #[test]
    fn test_require_role_in_held() {
        let roles = RoleSet::new(vec![Role::Landlord, Role::Renter]);
        assert!(require_role_in(&roles, Role::Landlord).is_ok());
    }

    #[test]
    fn test_require_ownership() {
        let user_id = Uuid::new_v4();

        assert!(require_ownership(user_id, user_id).is_ok());
        assert!(require_ownership(user_id, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_authz_error_display() {
        assert!(AuthzError::NoRoles.to_string().contains("no roles"));

        let err = AuthzError::InsufficientRole {
            required: Role::Admin,
            actual: Some(Role::Renter),
        };
        assert!(err.to_string().contains("Insufficient permissions"));

        assert!(AuthzError::NotAuthorized.to_string().contains("Not authorized"));
    }
}

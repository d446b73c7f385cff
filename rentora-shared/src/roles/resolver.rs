/// Role resolver
///
/// A `RoleSet` is the set of roles loaded for one user from the authoritative
/// `user_roles` table. Resolution is pure over the loaded set; the only I/O
/// entry points are [`RoleSet::load`] and [`RoleSet::load_or_empty`].
///
/// Two rules define this module:
///
/// - **No profile fallback.** When the loaded set is empty, `has_role` is
///   false for every role — the denormalized `profiles.role` field is never
///   consulted. A user whose authoritative role rows are gone must not be
///   treated as still holding a stale profile role.
/// - **Fail closed.** If the role query itself fails, the resolver reports
///   "no roles" rather than guessing; callers treat that the same as
///   unauthenticated for protected routes.
///
/// # Example
///
/// ```
/// use rentora_shared::models::role::Role;
/// use rentora_shared::roles::resolver::RoleSet;
///
/// let roles = RoleSet::new(vec![Role::Landlord, Role::Renter]);
/// assert!(roles.has_role(Role::Landlord));
/// assert!(!roles.has_role(Role::Admin));
/// assert_eq!(roles.primary_role(), Some(Role::Landlord));
/// ```

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::models::role::{Role, UserRole};

/// The set of roles held by one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    /// Builds a role set from already-loaded roles
    ///
    /// Duplicates are collapsed; insertion order is otherwise preserved.
    pub fn new(roles: Vec<Role>) -> Self {
        let mut deduped = Vec::with_capacity(roles.len());
        for role in roles {
            if !deduped.contains(&role) {
                deduped.push(role);
            }
        }
        Self { roles: deduped }
    }

    /// The empty role set
    ///
    /// Semantically "no roles": every `has_role` query is false and
    /// protected-route checks treat the holder as unauthorized.
    pub fn empty() -> Self {
        Self { roles: Vec::new() }
    }

    /// Loads the role set for a user from the authoritative store
    ///
    /// Reads only `user_roles`. A user with no rows gets the empty set, even
    /// if their profile still carries a denormalized role value.
    ///
    /// # Errors
    ///
    /// Returns an error if the role query fails; see [`RoleSet::load_or_empty`]
    /// for the fail-closed variant the route guard uses.
    pub async fn load(pool: &PgPool, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let roles = UserRole::roles_for_user(pool, user_id).await?;
        Ok(Self::new(roles))
    }

    /// Loads the role set, degrading a failed query to the empty set
    ///
    /// The failure is logged and the caller sees "no roles" — a denial, not
    /// an error page, and never a fallback to the profile's stale role.
    pub async fn load_or_empty(pool: &PgPool, user_id: Uuid) -> Self {
        match Self::load(pool, user_id).await {
            Ok(set) => set,
            Err(e) => {
                warn!(%user_id, error = %e, "Role query failed; treating user as having no roles");
                Self::empty()
            }
        }
    }

    /// True iff the role is present in the loaded set
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// True iff any of the given roles is present
    pub fn has_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has_role(*r))
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// The roles in the set
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// The highest-priority role present, or None when the set is empty
    ///
    /// Priority (admin > landlord > renter) is only used to choose a default
    /// landing page, never to escalate permissions.
    pub fn primary_role(&self) -> Option<Role> {
        self.roles.iter().copied().max_by_key(|r| r.priority())
    }

    /// The highest-priority role present, defaulting to renter when empty
    pub fn primary_role_or_default(&self) -> Role {
        self.primary_role().unwrap_or(Role::Renter)
    }
}

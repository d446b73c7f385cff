/// Route guard
///
/// Gates a protected route group on authentication state and an allowed-role
/// list. Per request the guard walks a one-shot decision:
///
/// - the role fetch is awaited in-line (there is no separate loading state to
///   observe over HTTP);
/// - no session ⇒ 401 pointing at the login entry point;
/// - session and an allowed role present ⇒ the request proceeds, with the
///   loaded [`RoleSet`] left in request extensions for handlers to reuse;
/// - session but no allowed role ⇒ 403 with an access-denied body naming the
///   required roles, the caller's current primary role, and a
///   role-appropriate default landing page.
///
/// A failed role fetch is terminal for the request and surfaces as a denial,
/// never as a 500: [`RoleSet::load_or_empty`] degrades it to "no roles". The
/// denormalized profile role is not an input anywhere in this module.
///
/// The decision itself ([`decide`]) is a pure function over
/// (authenticated?, role set, allowed list) so it can be tested without a
/// router or database.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::models::role::Role;
use crate::roles::resolver::RoleSet;
use super::session::SessionContext;

/// Login entry point unauthenticated callers are pointed at
pub const LOGIN_PATH: &str = "/login";

/// Outcome of one guard evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Authenticated and authorized; render the protected content
    Allow,

    /// No session; go authenticate
    RedirectToLogin,

    /// Authenticated but no allowed role matched
    Deny {
        /// Roles that would have been accepted
        required: Vec<Role>,

        /// The caller's current primary role, if they hold any role at all
        current: Option<Role>,

        /// Role-appropriate default landing page
        redirect_to: &'static str,
    },
}

/// Body of a 401 guard response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequired {
    /// Error code ("authentication_required")
    pub error: String,

    /// Where to authenticate
    pub login: String,
}

/// Body of a 403 guard response
///
/// Names what was required and what the caller actually holds, so the denial
/// is explicit rather than a silent redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDenied {
    /// Error code ("access_denied")
    pub error: String,

    /// Roles that would have been accepted
    pub required_roles: Vec<Role>,

    /// The caller's current primary role, if any
    pub current_role: Option<Role>,

    /// Role-appropriate default landing page
    pub redirect_to: String,
}

/// Pure guard decision over already-loaded state
///
/// An empty `allowed` list means the route only requires authentication.
/// The denial's landing page follows the caller's primary role: admin goes
/// to the admin home, landlord to the landlord home, everyone else (and
/// anyone with no roles) to the general home.
pub fn decide(authenticated: bool, roles: &RoleSet, allowed: &[Role]) -> GuardDecision {
    if !authenticated {
        return GuardDecision::RedirectToLogin;
    }

    if allowed.is_empty() || roles.has_any(allowed) {
        return GuardDecision::Allow;
    }

    let current = roles.primary_role();
    GuardDecision::Deny {
        required: allowed.to_vec(),
        current,
        redirect_to: current.map(|r| r.landing_path()).unwrap_or("/"),
    }
}

/// Guard middleware over a protected route group
///
/// Loads the caller's role set from the authoritative store (failing closed
/// to the empty set) and applies [`decide`]. On allow, the loaded `RoleSet`
/// is inserted into request extensions.
pub async fn require_roles(
    pool: PgPool,
    allowed: &'static [Role],
    mut req: Request,
    next: Next,
) -> Response {
    let session = req.extensions().get::<SessionContext>().cloned();

    let roles = match &session {
        Some(s) => RoleSet::load_or_empty(&pool, s.user_id).await,
        None => RoleSet::empty(),
    };

    match decide(session.is_some(), &roles, allowed) {
        GuardDecision::Allow => {
            req.extensions_mut().insert(roles);
            next.run(req).await
        }
        GuardDecision::RedirectToLogin => (
            StatusCode::UNAUTHORIZED,
            Json(LoginRequired {
                error: "authentication_required".to_string(),
                login: LOGIN_PATH.to_string(),
            }),
        )
            .into_response(),
        GuardDecision::Deny {
            required,
            current,
            redirect_to,
        } => (
            StatusCode::FORBIDDEN,
            Json(AccessDenied {
                error: "access_denied".to_string(),
                required_roles: required,
                current_role: current,
                redirect_to: redirect_to.to_string(),
            }),
        )
            .into_response(),
    }
}

/// Convenience wrapper for auth-only routes (no role requirement)
pub async fn require_session(pool: PgPool, req: Request, next: Next) -> Response {
    require_roles(pool, &[], req, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let decision = decide(false, &RoleSet::empty(), &[Role::Admin]);
        assert_eq!(decision, GuardDecision::RedirectToLogin);

        // Even with roles loaded somehow, no session means login
        let decision = decide(false, &RoleSet::new(vec![Role::Admin]), &[Role::Admin]);
        assert_eq!(decision, GuardDecision::RedirectToLogin);
    }

    #[test]
    fn test_empty_role_set_never_passes_a_role_gate() {
        // The stale-profile scenario: the authoritative set is empty, so the
        // caller is denied no matter what any denormalized field claims.
        let decision = decide(true, &RoleSet::empty(), &[Role::Admin]);
        assert_eq!(
            decision,
            GuardDecision::Deny {
                required: vec![Role::Admin],
                current: None,
                redirect_to: "/",
            }
        );
    }

    #[test]
    fn test_matching_role_allows() {
        let roles = RoleSet::new(vec![Role::Landlord]);
        assert_eq!(
            decide(true, &roles, &[Role::Landlord, Role::Admin]),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_auth_only_route_allows_any_session() {
        assert_eq!(decide(true, &RoleSet::empty(), &[]), GuardDecision::Allow);
    }

    #[test]
    fn test_denial_redirects_by_primary_role() {
        let landlord = RoleSet::new(vec![Role::Landlord]);
        match decide(true, &landlord, &[Role::Admin]) {
            GuardDecision::Deny {
                current,
                redirect_to,
                ..
            } => {
                assert_eq!(current, Some(Role::Landlord));
                assert_eq!(redirect_to, "/landlord");
            }
            other => panic!("Expected denial, got {:?}", other),
        }

        let admin = RoleSet::new(vec![Role::Admin]);
        match decide(true, &admin, &[Role::Landlord]) {
            GuardDecision::Deny { redirect_to, .. } => assert_eq!(redirect_to, "/admin"),
            other => panic!("Expected denial, got {:?}", other),
        }

        let renter = RoleSet::new(vec![Role::Renter]);
        match decide(true, &renter, &[Role::Admin]) {
            GuardDecision::Deny { redirect_to, .. } => assert_eq!(redirect_to, "/"),
            other => panic!("Expected denial, got {:?}", other),
        }
    }

    #[test]
    fn test_denial_names_required_roles() {
        let renter = RoleSet::new(vec![Role::Renter]);
        match decide(true, &renter, &[Role::Admin, Role::Landlord]) {
            GuardDecision::Deny { required, .. } => {
                assert_eq!(required, vec![Role::Admin, Role::Landlord]);
            }
            other => panic!("Expected denial, got {:?}", other),
        }
    }
}

/// Session middleware for Axum
///
/// Parses the `Authorization: Bearer <token>` header and, when the access
/// token validates, places a [`SessionContext`] in request extensions. The
/// middleware itself never rejects: a missing or invalid token simply leaves
/// no context behind, and the route guard downstream turns that into its
/// explicit 401 login redirect. Denial is an authorization decision, not a
/// header-parsing one.
///
/// The context is per-request state built fresh from the token — nothing is
/// cached across requests, so logout is the client discarding its tokens.
///
/// Handlers extract the context directly:
///
/// ```no_run
/// use rentora_shared::auth::session::SessionContext;
///
/// async fn protected_handler(session: SessionContext) -> String {
///     format!("Hello, user {}!", session.user_id)
/// }
/// ```

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::jwt::validate_access_token;

/// Per-request authenticated session state
///
/// Present in request extensions after the session middleware has validated
/// the bearer token. Routes that never saw a valid token never see one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

impl SessionContext {
    /// Creates a session context for a validated user
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

/// Rejection for handlers that require a session
#[derive(Debug)]
pub enum AuthError {
    /// No validated session on the request
    MissingCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
        }
    }
}

/// Bearer-token session middleware
///
/// Validates the access token when one is presented and attaches a
/// [`SessionContext`]. Requests without a usable token pass through
/// unauthenticated; the route guard decides what that means for the route.
pub async fn session_middleware(secret: String, mut req: Request, next: Next) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(token) = token {
        match validate_access_token(token, &secret) {
            Ok(claims) => {
                req.extensions_mut().insert(SessionContext::new(claims.sub));
            }
            Err(e) => {
                debug!(error = %e, "Rejected bearer token; continuing unauthenticated");
            }
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_context_new() {
        let user_id = Uuid::new_v4();
        let session = SessionContext::new(user_id);
        assert_eq!(session.user_id, user_id);
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

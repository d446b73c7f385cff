/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use rentora_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = rentora_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::middleware::security::security_headers_middleware;
use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use rentora_shared::auth::{guard, session};
use rentora_shared::models::role::Role;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Allowed-role lists for the guarded route groups
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const LANDLORD_ONLY: &[Role] = &[Role::Landlord];
const RENTER_ONLY: &[Role] = &[Role::Renter];
const ANY_MEMBER: &[Role] = &[Role::Landlord, Role::Renter];

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                            # Health check (public)
/// └── /v1/
///     ├── /auth/register|login|refresh   # Public
///     ├── GET  /properties[,/:id]        # Public browse
///     ├── /profile                       # Any session
///     ├── /messages/...                  # Any session
///     ├── POST/PUT /properties/...       # Landlord role
///     ├── /properties/:id/applications   # Renter role
///     ├── /applications                  # Landlord or renter role
///     └── /admin/...                     # Admin role
/// ```
///
/// # Middleware Stack
///
/// Outermost to innermost: trace logging, CORS, security headers, session
/// extraction (lenient — attaches `SessionContext` when a valid bearer token
/// is present), then per-group route guards that turn a missing session into
/// a 401 login pointer and a missing role into a 403 denial body.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Guard layers per protected group. Each captures its own pool handle;
    // the allowed lists are 'static so the guard can echo them in denials.
    let session_only = {
        let db = state.db.clone();
        axum::middleware::from_fn(move |req: axum::extract::Request, next: axum::middleware::Next| {
            guard::require_session(db.clone(), req, next)
        })
    };
    let landlord_guard = {
        let db = state.db.clone();
        axum::middleware::from_fn(move |req: axum::extract::Request, next: axum::middleware::Next| {
            guard::require_roles(db.clone(), LANDLORD_ONLY, req, next)
        })
    };
    let renter_guard = {
        let db = state.db.clone();
        axum::middleware::from_fn(move |req: axum::extract::Request, next: axum::middleware::Next| {
            guard::require_roles(db.clone(), RENTER_ONLY, req, next)
        })
    };
    let member_guard = {
        let db = state.db.clone();
        axum::middleware::from_fn(move |req: axum::extract::Request, next: axum::middleware::Next| {
            guard::require_roles(db.clone(), ANY_MEMBER, req, next)
        })
    };
    let admin_guard = {
        let db = state.db.clone();
        axum::middleware::from_fn(move |req: axum::extract::Request, next: axum::middleware::Next| {
            guard::require_roles(db.clone(), ADMIN_ONLY, req, next)
        })
    };

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Public browse
    let browse_routes = Router::new()
        .route("/properties", get(routes::properties::browse))
        .route("/properties/:id", get(routes::properties::get_property));

    // Any authenticated session
    let profile_routes = Router::new()
        .route(
            "/profile",
            get(routes::profile::get_profile).put(routes::profile::update_profile),
        )
        .layer(session_only.clone());

    let message_routes = Router::new()
        .route("/messages", post(routes::messages::send_message))
        .route("/messages/with/:user_id", get(routes::messages::conversation))
        .route("/messages/:id/read", post(routes::messages::mark_read))
        .layer(session_only);

    // Landlord role required
    let landlord_routes = Router::new()
        .route("/properties", post(routes::properties::create_property))
        .route("/properties/:id", put(routes::properties::update_property))
        .route("/properties/:id/unlist", post(routes::properties::unlist_property))
        .route("/my/properties", get(routes::properties::my_properties))
        .route(
            "/applications/:id/decide",
            post(routes::applications::decide_application),
        )
        .layer(landlord_guard);

    // Renter role required
    let renter_routes = Router::new()
        .route(
            "/properties/:id/applications",
            post(routes::applications::apply),
        )
        .route(
            "/applications/:id/withdraw",
            post(routes::applications::withdraw),
        )
        .layer(renter_guard);

    // Landlord or renter: each sees their own side of the table
    let application_routes = Router::new()
        .route("/applications", get(routes::applications::list_applications))
        .layer(member_guard);

    // Admin role required
    let admin_routes = Router::new()
        .route("/users", get(routes::admin::list_users_by_role))
        .route("/users/:id/role", post(routes::admin::assign_user_role))
        .route("/users/:id/suspend", post(routes::admin::suspend_user))
        .route("/users/:id/reinstate", post(routes::admin::reinstate_user))
        .route("/properties/:id/unlist", post(routes::admin::unlist_property))
        .layer(admin_guard);

    // Build complete v1 API
    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(browse_routes)
        .merge(profile_routes)
        .merge(message_routes)
        .merge(landlord_routes)
        .merge(renter_routes)
        .merge(application_routes)
        .nest("/admin", admin_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let session_layer = {
        let secret = state.jwt_secret().to_string();
        axum::middleware::from_fn(move |req: axum::extract::Request, next: axum::middleware::Next| {
            session::session_middleware(secret.clone(), req, next)
        })
    };

    let production = state.config.api.production;

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(session_layer)
        .layer(axum::middleware::from_fn(move |req: axum::extract::Request, next: axum::middleware::Next| {
            security_headers_middleware(production, req, next)
        }))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

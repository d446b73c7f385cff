/// Authentication and authorization utilities
///
/// Secure authentication primitives plus the request-scoped pieces the API
/// server layers onto its router:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength validation
/// - [`jwt`]: JWT token generation and validation
/// - [`session`]: per-request `SessionContext` extraction middleware
/// - [`guard`]: the route guard gating protected routes on allowed roles
/// - [`authorization`]: handler-level role and ownership checks
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with configurable expiration
/// - **Fail-closed roles**: a failed role load denies; it never widens
///   privilege from stale data

pub mod authorization;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod session;

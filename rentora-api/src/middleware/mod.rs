/// Middleware modules for the API server
///
/// Session extraction and the route guard live in `rentora-shared`; this
/// module holds the server-local layers:
/// - Security headers

pub mod security;

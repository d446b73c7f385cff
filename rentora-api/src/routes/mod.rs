/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `profile`: Own-profile read/update
/// - `properties`: Listing CRUD and public browse
/// - `applications`: Application lifecycle
/// - `messages`: Direct messages
/// - `admin`: Role assignment and moderation

pub mod admin;
pub mod applications;
pub mod auth;
pub mod health;
pub mod messages;
pub mod profile;
pub mod properties;

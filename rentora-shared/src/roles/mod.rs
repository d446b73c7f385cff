/// Role resolution and role assignment
///
/// The authorization core of the marketplace:
///
/// - [`resolver`]: answers "does this user hold role R?" over an
///   already-loaded role set, failing closed when the set is empty or the
///   load failed
/// - [`assignment`]: changes a user's role, keeping the authoritative
///   `user_roles` table and the denormalized `profiles.role` projection in
///   step inside one transaction
///
/// The route guard in [`crate::auth::guard`] consumes the resolver; the admin
/// API consumes the assignment functions.

pub mod assignment;
pub mod resolver;

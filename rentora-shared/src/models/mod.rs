/// Database models for Rentora
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Identity records and authentication state
/// - `profile`: Account-facing profile with the denormalized role projection
/// - `role`: The role enumeration and the authoritative `user_roles` store
/// - `property`: Rental listings owned by landlords
/// - `application`: Renter applications against listings
/// - `message`: Direct messages between users
///
/// # Example
///
/// ```no_run
/// use rentora_shared::models::user::{User, CreateUser};
/// use rentora_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod application;
pub mod message;
pub mod profile;
pub mod property;
pub mod role;
pub mod user;

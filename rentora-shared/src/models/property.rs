/// Property model and database operations
///
/// A property is a rental listing owned by a landlord. Browsing only ever
/// returns `listed` properties; unlisting (by the owner or an admin) and
/// marking rented are soft status flips, not deletes.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE property_status AS ENUM ('listed', 'unlisted', 'rented');
///
/// CREATE TABLE properties (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     landlord_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     address VARCHAR(512) NOT NULL,
///     city VARCHAR(128) NOT NULL,
///     rent_cents BIGINT NOT NULL,
///     bedrooms SMALLINT NOT NULL,
///     bathrooms SMALLINT NOT NULL,
///     status property_status NOT NULL DEFAULT 'listed',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Listing lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    /// Visible in browse results, accepts applications
    Listed,

    /// Hidden by the owner or an admin
    Unlisted,

    /// Let to a tenant; hidden from browse
    Rented,
}

impl PropertyStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Listed => "listed",
            PropertyStatus::Unlisted => "unlisted",
            PropertyStatus::Rented => "rented",
        }
    }
}

/// A rental listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    /// Unique listing ID
    pub id: Uuid,

    /// Owning landlord's user ID
    pub landlord_id: Uuid,

    /// Listing headline
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Street address
    pub address: String,

    /// City, used as the primary browse filter
    pub city: String,

    /// Monthly rent in cents
    pub rent_cents: i64,

    /// Number of bedrooms
    pub bedrooms: i16,

    /// Number of bathrooms
    pub bathrooms: i16,

    /// Listing lifecycle state
    pub status: PropertyStatus,

    /// When the listing was created
    pub created_at: DateTime<Utc>,

    /// When the listing was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProperty {
    /// Owning landlord's user ID
    pub landlord_id: Uuid,

    /// Listing headline
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// Monthly rent in cents
    pub rent_cents: i64,

    /// Number of bedrooms
    pub bedrooms: i16,

    /// Number of bathrooms
    pub bathrooms: i16,
}

/// Input for updating a listing; None fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProperty {
    /// New headline
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New street address
    pub address: Option<String>,

    /// New city
    pub city: Option<String>,

    /// New monthly rent in cents
    pub rent_cents: Option<i64>,

    /// New bedroom count
    pub bedrooms: Option<i16>,

    /// New bathroom count
    pub bathrooms: Option<i16>,
}

/// Browse filters; all optional, combined with AND
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowseFilter {
    /// Exact city match (case-insensitive)
    pub city: Option<String>,

    /// Maximum monthly rent in cents
    pub max_rent_cents: Option<i64>,

    /// Minimum number of bedrooms
    pub min_bedrooms: Option<i16>,
}

impl Property {
    /// Creates a listing
    ///
    /// New listings start in the `listed` state.
    ///
    /// # Errors
    ///
    /// Returns an error if the landlord doesn't exist (foreign key violation)
    /// or database connection fails
    pub async fn create(pool: &PgPool, data: CreateProperty) -> Result<Self, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties
                (landlord_id, title, description, address, city, rent_cents, bedrooms, bathrooms)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, landlord_id, title, description, address, city, rent_cents,
                      bedrooms, bathrooms, status, created_at, updated_at
            "#,
        )
        .bind(data.landlord_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.address)
        .bind(data.city)
        .bind(data.rent_cents)
        .bind(data.bedrooms)
        .bind(data.bathrooms)
        .fetch_one(pool)
        .await?;

        Ok(property)
    }

    /// Finds a listing by ID
    ///
    /// # Returns
    ///
    /// The listing if found, None otherwise
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, landlord_id, title, description, address, city, rent_cents,
                   bedrooms, bathrooms, status, created_at, updated_at
            FROM properties
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(property)
    }

    /// Updates a listing's details
    ///
    /// Fields left as None keep their current value. Ownership is checked by
    /// the caller; this method only scopes the update to the listing id.
    ///
    /// # Returns
    ///
    /// The updated listing if found, None otherwise
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProperty,
    ) -> Result<Option<Self>, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                city = COALESCE($5, city),
                rent_cents = COALESCE($6, rent_cents),
                bedrooms = COALESCE($7, bedrooms),
                bathrooms = COALESCE($8, bathrooms),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, landlord_id, title, description, address, city, rent_cents,
                      bedrooms, bathrooms, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.address)
        .bind(data.city)
        .bind(data.rent_cents)
        .bind(data.bedrooms)
        .bind(data.bathrooms)
        .fetch_optional(pool)
        .await?;

        Ok(property)
    }

    /// Sets a listing's lifecycle state
    ///
    /// # Returns
    ///
    /// The updated listing if found, None otherwise
    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: PropertyStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, landlord_id, title, description, address, city, rent_cents,
                      bedrooms, bathrooms, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(property)
    }

    /// Browses listed properties with optional filters and pagination
    ///
    /// Only `listed` properties are returned, newest first.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use rentora_shared::models::property::{BrowseFilter, Property};
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let filter = BrowseFilter {
    ///     city: Some("Portland".to_string()),
    ///     max_rent_cents: Some(250_000),
    ///     min_bedrooms: Some(2),
    /// };
    /// let page = Property::browse(&pool, &filter, 20, 0).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn browse(
        pool: &PgPool,
        filter: &BrowseFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, landlord_id, title, description, address, city, rent_cents,
                   bedrooms, bathrooms, status, created_at, updated_at
            FROM properties
            WHERE status = 'listed'
              AND ($1::VARCHAR IS NULL OR LOWER(city) = LOWER($1))
              AND ($2::BIGINT IS NULL OR rent_cents <= $2)
              AND ($3::SMALLINT IS NULL OR bedrooms >= $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.city.as_deref())
        .bind(filter.max_rent_cents)
        .bind(filter.min_bedrooms)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(properties)
    }

    /// Lists a landlord's own properties, any status, newest first
    pub async fn list_by_landlord(
        pool: &PgPool,
        landlord_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, landlord_id, title, description, address, city, rent_cents,
                   bedrooms, bathrooms, status, created_at, updated_at
            FROM properties
            WHERE landlord_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(landlord_id)
        .fetch_all(pool)
        .await?;

        Ok(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_status_as_str() {
        assert_eq!(PropertyStatus::Listed.as_str(), "listed");
        assert_eq!(PropertyStatus::Unlisted.as_str(), "unlisted");
        assert_eq!(PropertyStatus::Rented.as_str(), "rented");
    }

    #[test]
    fn test_browse_filter_default_is_unfiltered() {
        let filter = BrowseFilter::default();
        assert!(filter.city.is_none());
        assert!(filter.max_rent_cents.is_none());
        assert!(filter.min_bedrooms.is_none());
    }
}

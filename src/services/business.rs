use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ServiceError,
    models::business::{Business, UpsertBusinessRequest},
};

const BUSINESS_COLUMNS: &str =
    "id, name, description, address, category, phone, logo_url, created_at, updated_at";

pub struct BusinessService;

impl BusinessService {
    /// All businesses, optionally restricted to one category, by name.
    pub async fn list(
        pool: &PgPool,
        category: Option<&str>,
    ) -> Result<Vec<Business>, ServiceError> {
        let rows = sqlx::query_as::<_, Business>(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses
             WHERE ($1::TEXT IS NULL OR category = $1)
             ORDER BY name"
        ))
        .bind(category)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Business, ServiceError> {
        sqlx::query_as::<_, Business>(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ServiceError::NotFound("Business"))
    }

    /// Create or update the caller's own business profile.
    pub async fn upsert_own(
        pool: &PgPool,
        id: Uuid,
        req: &UpsertBusinessRequest,
    ) -> Result<Business, ServiceError> {
        if req.name.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Business name is required".into()));
        }
        let business = sqlx::query_as::<_, Business>(&format!(
            "INSERT INTO businesses (id, name, description, address, category, phone, logo_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE SET
                 name = EXCLUDED.name,
                 description = EXCLUDED.description,
                 address = EXCLUDED.address,
                 category = EXCLUDED.category,
                 phone = EXCLUDED.phone,
                 logo_url = EXCLUDED.logo_url,
                 updated_at = NOW()
             RETURNING {BUSINESS_COLUMNS}"
        ))
        .bind(id)
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(&req.address)
        .bind(&req.category)
        .bind(&req.phone)
        .bind(&req.logo_url)
        .fetch_one(pool)
        .await?;
        Ok(business)
    }
}

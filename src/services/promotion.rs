use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{profile_required, ServiceError},
    models::promotion::{CreatePromotionRequest, Promotion, UpdatePromotionRequest},
};

const PROMOTION_COLUMNS: &str = "id, business_id, title, description, discount_percentage, \
                                 start_date, end_date, is_active, created_at";

pub struct PromotionService;

impl PromotionService {
    pub async fn create(
        pool: &PgPool,
        business_id: Uuid,
        req: &CreatePromotionRequest,
    ) -> Result<Promotion, ServiceError> {
        req.validate().map_err(ServiceError::InvalidInput)?;
        let promotion = sqlx::query_as::<_, Promotion>(&format!(
            "INSERT INTO promotions (business_id, title, description, discount_percentage, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PROMOTION_COLUMNS}"
        ))
        .bind(business_id)
        .bind(req.title.trim())
        .bind(&req.description)
        .bind(req.discount_percentage)
        .bind(req.start_date)
        .bind(req.end_date)
        .fetch_one(pool)
        .await
        .map_err(profile_required("Business profile"))?;
        Ok(promotion)
    }

    /// Promotions redeemable on `today`, newest first.
    pub async fn list_active(
        pool: &PgPool,
        today: NaiveDate,
    ) -> Result<Vec<Promotion>, ServiceError> {
        let rows = sqlx::query_as::<_, Promotion>(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions
             WHERE is_active = TRUE
               AND (start_date IS NULL OR start_date <= $1)
               AND (end_date IS NULL OR end_date >= $1)
             ORDER BY created_at DESC"
        ))
        .bind(today)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_business(
        pool: &PgPool,
        business_id: Uuid,
    ) -> Result<Vec<Promotion>, ServiceError> {
        let rows = sqlx::query_as::<_, Promotion>(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions
             WHERE business_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(business_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Promotion, ServiceError> {
        sqlx::query_as::<_, Promotion>(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ServiceError::NotFound("Promotion"))
    }

    async fn get_owned(
        pool: &PgPool,
        business_id: Uuid,
        id: Uuid,
    ) -> Result<Promotion, ServiceError> {
        let promotion = Self::get(pool, id).await?;
        if promotion.business_id != business_id {
            return Err(ServiceError::Forbidden);
        }
        Ok(promotion)
    }

    pub async fn update(
        pool: &PgPool,
        business_id: Uuid,
        id: Uuid,
        req: &UpdatePromotionRequest,
    ) -> Result<Promotion, ServiceError> {
        req.validate().map_err(ServiceError::InvalidInput)?;
        let existing = Self::get_owned(pool, business_id, id).await?;
        let start = req.start_date.or(existing.start_date);
        let end = req.end_date.or(existing.end_date);
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(ServiceError::InvalidInput(
                    "End date must not precede start date".into(),
                ));
            }
        }

        let promotion = sqlx::query_as::<_, Promotion>(&format!(
            "UPDATE promotions SET
                 title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 discount_percentage = COALESCE($4, discount_percentage),
                 start_date = COALESCE($5, start_date),
                 end_date = COALESCE($6, end_date)
             WHERE id = $1
             RETURNING {PROMOTION_COLUMNS}"
        ))
        .bind(id)
        .bind(req.title.as_deref().map(str::trim))
        .bind(&req.description)
        .bind(req.discount_percentage)
        .bind(req.start_date)
        .bind(req.end_date)
        .fetch_optional(pool)
        .await?
        .ok_or(ServiceError::NotFound("Promotion"))?;
        Ok(promotion)
    }

    pub async fn set_active(
        pool: &PgPool,
        business_id: Uuid,
        id: Uuid,
        is_active: bool,
    ) -> Result<Promotion, ServiceError> {
        Self::get_owned(pool, business_id, id).await?;
        let promotion = sqlx::query_as::<_, Promotion>(&format!(
            "UPDATE promotions SET is_active = $2 WHERE id = $1 RETURNING {PROMOTION_COLUMNS}"
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(pool)
        .await?
        .ok_or(ServiceError::NotFound("Promotion"))?;
        Ok(promotion)
    }

    pub async fn delete(pool: &PgPool, business_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        Self::get_owned(pool, business_id, id).await?;
        sqlx::query("DELETE FROM promotions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

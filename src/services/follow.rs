use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{profile_required, ServiceError},
    models::follow::FollowedBusiness,
};

pub struct FollowService;

impl FollowService {
    /// Idempotent: following twice keeps the original timestamp.
    pub async fn follow(
        pool: &PgPool,
        client_id: Uuid,
        business_id: Uuid,
    ) -> Result<(), ServiceError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM businesses WHERE id = $1)")
                .bind(business_id)
                .fetch_one(pool)
                .await?;
        if !exists {
            return Err(ServiceError::NotFound("Business"));
        }

        sqlx::query(
            "INSERT INTO followed_businesses (client_id, business_id)
             VALUES ($1, $2)
             ON CONFLICT (client_id, business_id) DO NOTHING",
        )
        .bind(client_id)
        .bind(business_id)
        .execute(pool)
        .await
        .map_err(profile_required("Client profile"))?;
        Ok(())
    }

    pub async fn unfollow(
        pool: &PgPool,
        client_id: Uuid,
        business_id: Uuid,
    ) -> Result<(), ServiceError> {
        sqlx::query("DELETE FROM followed_businesses WHERE client_id = $1 AND business_id = $2")
            .bind(client_id)
            .bind(business_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn list_followed(
        pool: &PgPool,
        client_id: Uuid,
    ) -> Result<Vec<FollowedBusiness>, ServiceError> {
        let rows = sqlx::query_as::<_, FollowedBusiness>(
            "SELECT b.id AS business_id, b.name, b.category, b.logo_url, f.created_at AS followed_at
             FROM followed_businesses f
             JOIN businesses b ON b.id = f.business_id
             WHERE f.client_id = $1
             ORDER BY f.created_at DESC",
        )
        .bind(client_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn is_following(
        pool: &PgPool,
        client_id: Uuid,
        business_id: Uuid,
    ) -> Result<bool, ServiceError> {
        let following: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM followed_businesses WHERE client_id = $1 AND business_id = $2)",
        )
        .bind(client_id)
        .bind(business_id)
        .fetch_one(pool)
        .await?;
        Ok(following)
    }

    pub async fn follower_count(pool: &PgPool, business_id: Uuid) -> Result<i64, ServiceError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)::BIGINT FROM followed_businesses WHERE business_id = $1",
        )
        .bind(business_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ServiceError,
    models::client::{Client, UpsertClientRequest},
};

pub struct ClientService;

impl ClientService {
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Client, ServiceError> {
        sqlx::query_as::<_, Client>(
            "SELECT id, full_name, phone, created_at, updated_at FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ServiceError::NotFound("Client"))
    }

    pub async fn upsert_own(
        pool: &PgPool,
        id: Uuid,
        req: &UpsertClientRequest,
    ) -> Result<Client, ServiceError> {
        if req.full_name.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Full name is required".into()));
        }
        let client = sqlx::query_as::<_, Client>(
            "INSERT INTO clients (id, full_name, phone)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET
                 full_name = EXCLUDED.full_name,
                 phone = EXCLUDED.phone,
                 updated_at = NOW()
             RETURNING id, full_name, phone, created_at, updated_at",
        )
        .bind(id)
        .bind(req.full_name.trim())
        .bind(&req.phone)
        .fetch_one(pool)
        .await?;
        Ok(client)
    }
}

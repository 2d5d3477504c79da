use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{profile_required, ServiceError},
    models::menu::{CreateMenuRequest, DailyMenu, UpdateMenuRequest},
    services::expiry::{is_current, partition, Partition},
};

const MENU_COLUMNS: &str =
    "id, business_id, name, description, price, allows_reservations, menu_date, created_at";

/// A business's own menus, split by the daily-expiry rule. Expired ones are
/// still listed until the cleanup job removes them.
#[derive(Debug, Serialize)]
pub struct BusinessMenus {
    pub current: Vec<DailyMenu>,
    pub expired: Vec<DailyMenu>,
}

pub struct MenuService;

impl MenuService {
    /// Publish a menu for `today`.
    pub async fn create_for_today(
        pool: &PgPool,
        business_id: Uuid,
        req: &CreateMenuRequest,
        today: NaiveDate,
    ) -> Result<DailyMenu, ServiceError> {
        req.validate().map_err(ServiceError::InvalidInput)?;
        let menu = sqlx::query_as::<_, DailyMenu>(&format!(
            "INSERT INTO daily_menus (business_id, name, description, price, allows_reservations, menu_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {MENU_COLUMNS}"
        ))
        .bind(business_id)
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(req.price)
        .bind(req.allows_reservations)
        .bind(today)
        .fetch_one(pool)
        .await
        .map_err(profile_required("Business profile"))?;
        Ok(menu)
    }

    /// Menus dated `today`, optionally for one business. Stale rows that the
    /// cleanup has not removed yet are filtered out here.
    pub async fn list_current(
        pool: &PgPool,
        today: NaiveDate,
        business_id: Option<Uuid>,
    ) -> Result<Vec<DailyMenu>, ServiceError> {
        let menus = sqlx::query_as::<_, DailyMenu>(&format!(
            "SELECT {MENU_COLUMNS} FROM daily_menus
             WHERE menu_date = $1 AND ($2::UUID IS NULL OR business_id = $2)
             ORDER BY created_at DESC"
        ))
        .bind(today)
        .bind(business_id)
        .fetch_all(pool)
        .await?;
        Ok(menus)
    }

    pub async fn list_for_business(
        pool: &PgPool,
        business_id: Uuid,
        today: NaiveDate,
    ) -> Result<BusinessMenus, ServiceError> {
        let menus = sqlx::query_as::<_, DailyMenu>(&format!(
            "SELECT {MENU_COLUMNS} FROM daily_menus
             WHERE business_id = $1
             ORDER BY menu_date DESC, created_at DESC"
        ))
        .bind(business_id)
        .fetch_all(pool)
        .await?;

        let Partition { current, expired } = partition(menus, today);
        Ok(BusinessMenus { current, expired })
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<DailyMenu, ServiceError> {
        sqlx::query_as::<_, DailyMenu>(&format!(
            "SELECT {MENU_COLUMNS} FROM daily_menus WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ServiceError::NotFound("Menu"))
    }

    /// Owners may edit a menu only while it is current.
    pub async fn update(
        pool: &PgPool,
        business_id: Uuid,
        id: Uuid,
        req: &UpdateMenuRequest,
        today: NaiveDate,
    ) -> Result<DailyMenu, ServiceError> {
        req.validate().map_err(ServiceError::InvalidInput)?;
        let existing = Self::get(pool, id).await?;
        if existing.business_id != business_id {
            return Err(ServiceError::Forbidden);
        }
        if !is_current(existing.menu_date, today) {
            return Err(ServiceError::Conflict("Menu has expired".into()));
        }

        let menu = sqlx::query_as::<_, DailyMenu>(&format!(
            "UPDATE daily_menus SET
                 name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 price = COALESCE($4, price),
                 allows_reservations = COALESCE($5, allows_reservations)
             WHERE id = $1
             RETURNING {MENU_COLUMNS}"
        ))
        .bind(id)
        .bind(req.name.as_deref().map(str::trim))
        .bind(&req.description)
        .bind(req.price)
        .bind(req.allows_reservations)
        .fetch_optional(pool)
        .await?
        .ok_or(ServiceError::NotFound("Menu"))?;
        Ok(menu)
    }

    /// Reservations pointing at the menu are left in place; they expire by date.
    pub async fn delete(pool: &PgPool, business_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let existing = Self::get(pool, id).await?;
        if existing.business_id != business_id {
            return Err(ServiceError::Forbidden);
        }
        sqlx::query("DELETE FROM daily_menus WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{is_unique_violation, profile_required, ServiceError},
    models::menu::MenuReservation,
    services::{expiry::is_current, menu::MenuService},
};

const RESERVATION_COLUMNS: &str = "id, menu_id, client_id, business_id, menu_name, menu_price, \
                                   reservation_date, created_at";

pub struct ReservationService;

impl ReservationService {
    /// Reserve today's menu for a client. The menu's name and price are copied
    /// so the reservation reads the same after the menu is gone.
    pub async fn reserve(
        pool: &PgPool,
        client_id: Uuid,
        menu_id: Uuid,
        today: NaiveDate,
    ) -> Result<MenuReservation, ServiceError> {
        let menu = MenuService::get(pool, menu_id).await?;
        if !is_current(menu.menu_date, today) {
            return Err(ServiceError::Conflict("Menu is no longer available".into()));
        }
        if !menu.allows_reservations {
            return Err(ServiceError::Conflict("Menu does not accept reservations".into()));
        }

        let res = sqlx::query_as::<_, MenuReservation>(&format!(
            "INSERT INTO menu_reservations
                 (menu_id, client_id, business_id, menu_name, menu_price, reservation_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(menu.id)
        .bind(client_id)
        .bind(menu.business_id)
        .bind(&menu.name)
        .bind(menu.price)
        .bind(today)
        .fetch_one(pool)
        .await;

        match res {
            Ok(reservation) => Ok(reservation),
            Err(e) if is_unique_violation(&e) => {
                Err(ServiceError::Conflict("Menu already reserved".into()))
            }
            Err(e) => Err(profile_required("Client profile")(e)),
        }
    }

    /// A client's reservations for today.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<MenuReservation>, ServiceError> {
        let rows = sqlx::query_as::<_, MenuReservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM menu_reservations
             WHERE client_id = $1 AND reservation_date = $2
             ORDER BY created_at DESC"
        ))
        .bind(client_id)
        .bind(today)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Reservations received by a business for today.
    pub async fn list_for_business(
        pool: &PgPool,
        business_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<MenuReservation>, ServiceError> {
        let rows = sqlx::query_as::<_, MenuReservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM menu_reservations
             WHERE business_id = $1 AND reservation_date = $2
             ORDER BY created_at"
        ))
        .bind(business_id)
        .bind(today)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn cancel(pool: &PgPool, client_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let owner: Option<Uuid> =
            sqlx::query_scalar("SELECT client_id FROM menu_reservations WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        match owner {
            None => Err(ServiceError::NotFound("Reservation")),
            Some(owner) if owner != client_id => Err(ServiceError::Forbidden),
            Some(_) => {
                sqlx::query("DELETE FROM menu_reservations WHERE id = $1")
                    .bind(id)
                    .execute(pool)
                    .await?;
                Ok(())
            }
        }
    }
}

//! Rows the store-backed service tests start from.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn business(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO businesses (id, name) VALUES ($1, 'Casa Pepe')")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
    id
}

pub async fn client(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO clients (id, full_name) VALUES ($1, 'Lucía Gómez')")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
    id
}

pub async fn menus(pool: &PgPool, business_id: Uuid, day: NaiveDate, n: usize) {
    for i in 0..n {
        sqlx::query("INSERT INTO daily_menus (business_id, name, price, menu_date) VALUES ($1, $2, 9.5, $3)")
            .bind(business_id)
            .bind(format!("Menú {i}"))
            .bind(day)
            .execute(pool)
            .await
            .unwrap();
    }
}

/// Reservations against menus that need not exist any more.
pub async fn reservations(pool: &PgPool, business_id: Uuid, client_id: Uuid, day: NaiveDate, n: usize) {
    for _ in 0..n {
        sqlx::query(
            "INSERT INTO menu_reservations (menu_id, client_id, business_id, menu_name, reservation_date)
             VALUES ($1, $2, $3, 'Menú del día', $4)",
        )
        .bind(Uuid::new_v4())
        .bind(client_id)
        .bind(business_id)
        .bind(day)
        .execute(pool)
        .await
        .unwrap();
    }
}

/// An undated, enabled promotion: active on any day.
pub async fn promotion(pool: &PgPool, business_id: Uuid) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO promotions (business_id, title, discount_percentage)
         VALUES ($1, '2x1 en menús', 50)
         RETURNING id",
    )
    .bind(business_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn qr_code(pool: &PgPool, business_id: Uuid, code: &str, status: &str) {
    sqlx::query(
        "INSERT INTO business_qr_codes (business_id, four_digit_code, qr_payload, status)
         VALUES ($1, $2, 'https://fuddi.app/redeem', $3)",
    )
    .bind(business_id)
    .bind(code)
    .bind(status)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}

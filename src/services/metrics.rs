use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_gauge, CounterVec, Gauge};
use sqlx::PgPool;
use tracing::{info, warn};

lazy_static! {
    // ── Event counters ──────────────────────────────────────────────────────
    pub static ref CLEANUP_RUNS_COUNTER: CounterVec = register_counter_vec!(
        "fuddi_cleanup_runs_total",
        "Daily cleanup runs by trigger and status",
        &["trigger", "status"]
    ).unwrap();

    pub static ref CLEANUP_DELETED_COUNTER: CounterVec = register_counter_vec!(
        "fuddi_cleanup_deleted_rows_total",
        "Expired rows deleted by the daily cleanup, by table",
        &["table"]
    ).unwrap();

    pub static ref CODE_VALIDATIONS_COUNTER: CounterVec = register_counter_vec!(
        "fuddi_code_validations_total",
        "4-digit code validations by outcome (valid, invalid, fail_open, error)",
        &["outcome"]
    ).unwrap();

    pub static ref REDEMPTIONS_COUNTER: CounterVec = register_counter_vec!(
        "fuddi_redemptions_total",
        "Promotion redemption attempts by method and status",
        &["method", "status"]
    ).unwrap();

    // ── Business metrics ────────────────────────────────────────────────────
    pub static ref BUSINESSES_GAUGE: Gauge = register_gauge!(
        "fuddi_businesses_total",
        "Registered businesses"
    ).unwrap();

    pub static ref CLIENTS_GAUGE: Gauge = register_gauge!(
        "fuddi_clients_total",
        "Registered clients"
    ).unwrap();

    pub static ref ACTIVE_PROMOTIONS_GAUGE: Gauge = register_gauge!(
        "fuddi_promotions_active_total",
        "Promotions active today"
    ).unwrap();

    pub static ref CURRENT_MENUS_GAUGE: Gauge = register_gauge!(
        "fuddi_daily_menus_current_total",
        "Daily menus dated today"
    ).unwrap();

    pub static ref TODAY_RESERVATIONS_GAUGE: Gauge = register_gauge!(
        "fuddi_reservations_today_total",
        "Menu reservations dated today"
    ).unwrap();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(pool: PgPool) {
    tokio::spawn(async move {
        if let Err(e) = collect(&pool).await {
            warn!("Metrics: initial collection failed: {}", e);
        }
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
            if let Err(e) = collect(&pool).await {
                warn!("Metrics: collection failed: {}", e);
            }
        }
    });
}

async fn collect(pool: &PgPool) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();

    let businesses: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM businesses")
        .fetch_one(pool)
        .await?;
    BUSINESSES_GAUGE.set(businesses as f64);

    let clients: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM clients")
        .fetch_one(pool)
        .await
        .unwrap_or(0);
    CLIENTS_GAUGE.set(clients as f64);

    let promotions: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)::BIGINT FROM promotions
         WHERE is_active = TRUE
           AND (start_date IS NULL OR start_date <= $1)
           AND (end_date IS NULL OR end_date >= $1)",
    )
    .bind(today)
    .fetch_one(pool)
    .await
    .unwrap_or(0);
    ACTIVE_PROMOTIONS_GAUGE.set(promotions as f64);

    let menus: i64 =
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM daily_menus WHERE menu_date = $1")
            .bind(today)
            .fetch_one(pool)
            .await
            .unwrap_or(0);
    CURRENT_MENUS_GAUGE.set(menus as f64);

    let reservations: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)::BIGINT FROM menu_reservations WHERE reservation_date = $1",
    )
    .bind(today)
    .fetch_one(pool)
    .await
    .unwrap_or(0);
    TODAY_RESERVATIONS_GAUGE.set(reservations as f64);

    info!("Metrics: collected ({} businesses, {} current menus)", businesses, menus);
    Ok(())
}

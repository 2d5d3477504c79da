//! Daily cleanup of expired menus and reservations.
//! Schedule: once a day shortly after UTC midnight (in-process scheduler,
//! `cleanup-expired` CLI from cron, or the HTTP function endpoint).
//!
//! Rules:
//! - daily_menus: menu_date <> today → hard-delete
//! - menu_reservations: reservation_date <> today → hard-delete
//!
//! Deletes target a date predicate, not ids, so overlapping runs from
//! different triggers are harmless. Each table is its own step: a failing
//! step is logged and recorded in the report, the others still run, and the
//! next run picks up whatever was left.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

use crate::services::metrics::{CLEANUP_DELETED_COUNTER, CLEANUP_RUNS_COUNTER};

/// Which call site started a cleanup run (metrics label).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupTrigger {
    Http,
    Scheduler,
    Cli,
}

impl CleanupTrigger {
    fn as_str(self) -> &'static str {
        match self {
            CleanupTrigger::Http => "http",
            CleanupTrigger::Scheduler => "scheduler",
            CleanupTrigger::Cli => "cli",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CleanupStatistics {
    pub current_menus: i64,
    pub total_menus: i64,
    pub remaining_expired_menus: i64,
}

/// Outcome of one run. A `None` count means that step failed; `errors` has
/// one entry per failed step.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_menus: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_reservations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<CleanupStatistics>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl CleanupReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn message(&self) -> String {
        let count = |n: Option<u64>| n.map_or_else(|| "?".to_string(), |n| n.to_string());
        if self.is_success() {
            format!(
                "Cleanup completed: {} expired menu(s) and {} expired reservation(s) deleted",
                count(self.deleted_menus),
                count(self.deleted_reservations)
            )
        } else {
            format!("Cleanup failed: {}", self.errors.join("; "))
        }
    }
}

/// What a cleanup run would delete right now.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CleanupPreview {
    pub expired_menus: i64,
    pub expired_reservations: i64,
    pub current_menus: i64,
    pub current_reservations: i64,
}

pub struct CleanupService;

impl CleanupService {
    /// Delete every menu and reservation not dated `today`, then report what is left.
    pub async fn run(pool: &PgPool, today: NaiveDate, trigger: CleanupTrigger) -> CleanupReport {
        let report = Self::run_steps(pool, today).await;
        let status = if report.is_success() { "success" } else { "error" };
        CLEANUP_RUNS_COUNTER
            .with_label_values(&[trigger.as_str(), status])
            .inc();
        report
    }

    async fn run_steps(pool: &PgPool, today: NaiveDate) -> CleanupReport {
        tracing::info!("Cleanup: removing menus and reservations not dated {today}");
        let mut errors = Vec::new();

        // 1. Menus
        let deleted_menus = Self::delete_expired(
            pool,
            today,
            "daily_menus",
            "DELETE FROM daily_menus WHERE menu_date <> $1",
            &mut errors,
        )
        .await;

        // 2. Reservations
        let deleted_reservations = Self::delete_expired(
            pool,
            today,
            "menu_reservations",
            "DELETE FROM menu_reservations WHERE reservation_date <> $1",
            &mut errors,
        )
        .await;

        // 3. What remains
        let statistics = match Self::statistics(pool, today).await {
            Ok(stats) => {
                if stats.remaining_expired_menus > 0 {
                    tracing::warn!(
                        "Cleanup: {} expired menu(s) remain after cleanup",
                        stats.remaining_expired_menus
                    );
                }
                Some(stats)
            }
            Err(e) => {
                tracing::error!("Cleanup: reading menu statistics failed: {e:#}");
                errors.push("reading menu statistics failed".to_string());
                None
            }
        };

        CleanupReport {
            date: today,
            deleted_menus,
            deleted_reservations,
            statistics,
            errors,
        }
    }

    async fn delete_expired(
        pool: &PgPool,
        today: NaiveDate,
        table: &'static str,
        sql: &'static str,
        errors: &mut Vec<String>,
    ) -> Option<u64> {
        match sqlx::query(sql).bind(today).execute(pool).await {
            Ok(res) => {
                let deleted = res.rows_affected();
                CLEANUP_DELETED_COUNTER
                    .with_label_values(&[table])
                    .inc_by(deleted as f64);
                tracing::info!("Cleanup: deleted {deleted} expired row(s) from {table}");
                Some(deleted)
            }
            Err(e) => {
                tracing::error!("Cleanup: deleting expired rows from {table} failed: {e}");
                errors.push(format!("deleting expired rows from {table} failed"));
                None
            }
        }
    }

    pub async fn statistics(pool: &PgPool, today: NaiveDate) -> anyhow::Result<CleanupStatistics> {
        let (current_menus, total_menus, remaining_expired_menus): (i64, i64, i64) =
            sqlx::query_as(
                "SELECT COUNT(*) FILTER (WHERE menu_date = $1),
                        COUNT(*)::BIGINT,
                        COUNT(*) FILTER (WHERE menu_date <> $1)
                 FROM daily_menus",
            )
            .bind(today)
            .fetch_one(pool)
            .await?;

        Ok(CleanupStatistics {
            current_menus,
            total_menus,
            remaining_expired_menus,
        })
    }

    /// Count what `run` would delete, without deleting.
    pub async fn preview(pool: &PgPool, today: NaiveDate) -> anyhow::Result<CleanupPreview> {
        let (expired_menus, current_menus): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE menu_date <> $1),
                    COUNT(*) FILTER (WHERE menu_date = $1)
             FROM daily_menus",
        )
        .bind(today)
        .fetch_one(pool)
        .await?;

        let (expired_reservations, current_reservations): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE reservation_date <> $1),
                    COUNT(*) FILTER (WHERE reservation_date = $1)
             FROM menu_reservations",
        )
        .bind(today)
        .fetch_one(pool)
        .await?;

        Ok(CleanupPreview {
            expired_menus,
            expired_reservations,
            current_menus,
            current_reservations,
        })
    }
}

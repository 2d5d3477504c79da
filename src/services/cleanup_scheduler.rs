use chrono::{NaiveTime, Timelike, Utc};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::services::cleanup::{CleanupService, CleanupTrigger};
use crate::services::expiry::today_utc;

/// Spawn a background task that wakes up once a day at `at` (UTC) and runs the
/// expired menu / reservation cleanup. Runs from other triggers are not
/// coordinated with this one.
pub fn start(pool: PgPool, at: NaiveTime) {
    tokio::spawn(async move {
        loop {
            let now = Utc::now().time();
            let wait = secs_until(now, at);
            info!("Cleanup scheduler: next run in {wait}s (at {at} UTC)");
            tokio::time::sleep(tokio::time::Duration::from_secs(wait)).await;

            let report = CleanupService::run(&pool, today_utc(), CleanupTrigger::Scheduler).await;
            if report.is_success() {
                info!("Cleanup scheduler: {}", report.message());
            } else {
                warn!("Cleanup scheduler: {}", report.message());
            }
        }
    });
}

/// Seconds from `now` until the next occurrence of `target`; a full day when
/// they coincide so a run never fires twice in the same second.
fn secs_until(now: NaiveTime, target: NaiveTime) -> u64 {
    let now_secs = now.num_seconds_from_midnight() as u64;
    let target_secs = target.num_seconds_from_midnight() as u64;
    if now_secs < target_secs {
        target_secs - now_secs
    } else {
        86_400 - now_secs + target_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn later_today() {
        assert_eq!(secs_until(t(0, 0, 0), t(0, 5, 0)), 300);
        assert_eq!(secs_until(t(23, 0, 0), t(23, 30, 0)), 1_800);
    }

    #[test]
    fn wraps_to_tomorrow() {
        assert_eq!(secs_until(t(0, 6, 0), t(0, 5, 0)), 86_400 - 60);
        assert_eq!(secs_until(t(0, 5, 0), t(0, 5, 0)), 86_400);
    }
}

//! Delete daily menus and menu reservations not dated today.
//! Run daily from cron (e.g. `5 0 * * * /app/cleanup-expired`) when the
//! in-process scheduler is disabled, or by hand.
//!
//! Usage: cleanup-expired [--date YYYY-MM-DD] [--dry-run]

use chrono::NaiveDate;
use clap::Parser;

use fuddi_api::db;
use fuddi_api::services::cleanup::{CleanupService, CleanupTrigger};
use fuddi_api::services::expiry::today_utc;

#[derive(Parser)]
#[command(name = "cleanup-expired", about = "Delete expired daily menus and reservations")]
struct Args {
    /// Reference day (defaults to today in UTC)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Only report what would be deleted
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable not set"))?;
    let pool = db::create_pool(&database_url, 2).await?;

    let today = args.date.unwrap_or_else(today_utc);

    if args.dry_run {
        let preview = CleanupService::preview(&pool, today).await?;
        tracing::info!(
            "Dry run for {today}: {} expired menu(s), {} expired reservation(s) would be deleted \
             ({} current menu(s), {} current reservation(s) kept)",
            preview.expired_menus,
            preview.expired_reservations,
            preview.current_menus,
            preview.current_reservations
        );
        return Ok(());
    }

    let report = CleanupService::run(&pool, today, CleanupTrigger::Cli).await;
    if !report.is_success() {
        anyhow::bail!(report.message());
    }
    match report.statistics {
        Some(stats) => tracing::info!(
            "{} (current menus: {}, total: {}, remaining expired: {})",
            report.message(),
            stats.current_menus,
            stats.total_menus,
            stats.remaining_expired_menus
        ),
        None => tracing::info!("{}", report.message()),
    }

    Ok(())
}

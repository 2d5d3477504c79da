use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fuddi_api::{
    build_router,
    config::{Config, FailurePolicy},
    db, services, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    services::metrics::start(pool.clone());

    if config.cleanup_schedule_enabled {
        services::cleanup_scheduler::start(pool.clone(), config.cleanup_time);
        info!("Daily cleanup scheduled at {} UTC", config.cleanup_time);
    } else {
        info!("In-process cleanup scheduler disabled");
    }

    if config.redemption_failure_policy == FailurePolicy::Open {
        warn!("REDEMPTION_FAILURE_POLICY=open: codes are accepted when the lookup fails");
    }

    let state = AppState {
        db: pool,
        config: config.clone(),
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Fuddi API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

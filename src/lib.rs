// Library exports for the binaries and integration tests
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use middleware::auth::JwtSecret;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

/// CORS: the front-end origin plus localhost for development.
fn cors_layer(app_base_url: &str) -> CorsLayer {
    let base = app_base_url.to_string();
    let origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") || o == base
    });

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("apikey"),
            header::HeaderName::from_static("x-client-info"),
        ]))
        .allow_origin(origin)
}

pub fn build_router(state: AppState) -> Router {
    let jwt_secret = JwtSecret(state.config.jwt_secret.clone());
    let cors = cors_layer(&state.config.app_base_url);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        // Scheduled cleanup function
        .route(
            "/functions/cleanup-expired-menus",
            get(routes::cleanup::cleanup_expired_menus).post(routes::cleanup::cleanup_expired_menus),
        )
        .route("/functions/cleanup-expired-menus/preview", get(routes::cleanup::preview))
        // Businesses & clients
        .route("/businesses", get(routes::businesses::list_businesses))
        .route("/businesses/me", put(routes::businesses::upsert_my_business))
        .route("/businesses/{id}", get(routes::businesses::get_business))
        .route("/businesses/{id}/followers/count", get(routes::businesses::follower_count))
        .route("/businesses/{id}/promotions", get(routes::promotions::list_for_business))
        .route("/businesses/{id}/menus", get(routes::menu::list_for_business))
        .route("/clients/me", get(routes::clients::get_me).put(routes::clients::upsert_me))
        // Promotions
        .route("/promotions", get(routes::promotions::list_active).post(routes::promotions::create_promotion))
        .route("/promotions/{id}", put(routes::promotions::update_promotion).delete(routes::promotions::delete_promotion))
        .route("/promotions/{id}/active", post(routes::promotions::set_active))
        // Daily menus & reservations
        .route("/menus", get(routes::menu::list_current).post(routes::menu::create_menu))
        .route("/menus/{id}", put(routes::menu::update_menu).delete(routes::menu::delete_menu))
        .route("/menus/{id}/reservations", post(routes::menu::reserve_menu))
        .route("/reservations", get(routes::reservations::list_reservations))
        .route("/reservations/{id}", delete(routes::reservations::cancel_reservation))
        // Follows
        .route("/follows", get(routes::follows::list_followed))
        .route(
            "/follows/{business_id}",
            get(routes::follows::is_following).put(routes::follows::follow).delete(routes::follows::unfollow),
        )
        // QR codes & redemptions
        .route("/qr-codes/active", get(routes::qr_codes::get_active))
        .route("/qr-codes/rotate", post(routes::qr_codes::rotate))
        .route("/qr-codes/validate", post(routes::qr_codes::validate))
        .route("/redemptions", get(routes::redemptions::list_redemptions).post(routes::redemptions::redeem))
        .route("/redemptions/today", get(routes::redemptions::redeemed_today))
        .route("/redemptions/daily", get(routes::redemptions::daily_counts))
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

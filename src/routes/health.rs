use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{services::expiry::today_utc, AppState};

/// GET /health: reports store connectivity and the day the expiry rule uses.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let today = today_utc();
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "db": "connected", "today": today })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "db": e.to_string(), "today": today })),
        ),
    }
}

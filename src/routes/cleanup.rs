use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::ServiceError,
    models::auth::AuthenticatedUser,
    services::{
        cleanup::{CleanupPreview, CleanupReport, CleanupService, CleanupTrigger},
        expiry::today_utc,
    },
    AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CleanupSuccess {
    success: bool,
    message: String,
    #[serde(flatten)]
    report: CleanupReport,
    timestamp: DateTime<Utc>,
}

/// Body of a run where at least one step failed; the counts of the steps
/// that did complete are still reported.
#[derive(Serialize)]
struct CleanupFailure {
    success: bool,
    error: String,
    #[serde(flatten)]
    report: CleanupReport,
    timestamp: DateTime<Utc>,
}

/// POST|GET /functions/cleanup-expired-menus: any authenticated caller.
/// CORS preflight is answered by the CORS layer before reaching here.
pub async fn cleanup_expired_menus(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Response {
    tracing::info!("Cleanup requested over HTTP by {} {}", user.role, user.user_id);

    let report = CleanupService::run(&state.db, today_utc(), CleanupTrigger::Http).await;
    if report.is_success() {
        Json(CleanupSuccess {
            success: true,
            message: report.message(),
            report,
            timestamp: Utc::now(),
        })
        .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(CleanupFailure {
                success: false,
                error: report.errors.join("; "),
                report,
                timestamp: Utc::now(),
            }),
        )
            .into_response()
    }
}

/// GET /functions/cleanup-expired-menus/preview
pub async fn preview(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<CleanupPreview>, ServiceError> {
    CleanupService::preview(&state.db, today_utc())
        .await
        .map(Json)
        .map_err(ServiceError::Internal)
}

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    error::ServiceError,
    models::{
        auth::AuthenticatedUser,
        qr_code::{BusinessQrCode, ValidateCodeRequest},
    },
    services::qr_code::QrCodeService,
    AppState,
};

/// GET /qr-codes/active: the caller's current code, if any
pub async fn get_active(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Option<BusinessQrCode>>, ServiceError> {
    let business_id = user.require_business()?;
    QrCodeService::get_active(&state.db, business_id)
        .await
        .map(Json)
}

/// POST /qr-codes/rotate: issue a new code, deactivating the previous one
pub async fn rotate(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<BusinessQrCode>, ServiceError> {
    let business_id = user.require_business()?;
    QrCodeService::rotate(&state.db, business_id, &state.config.app_base_url)
        .await
        .map(Json)
}

/// POST /qr-codes/validate
pub async fn validate(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(body): Json<ValidateCodeRequest>,
) -> Result<Json<Value>, ServiceError> {
    let valid = QrCodeService::validate_four_digit_code(
        &state.db,
        body.business_id,
        &body.code,
        state.config.redemption_failure_policy,
    )
    .await?;
    Ok(Json(json!({ "valid": valid })))
}

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde_json::{json, Value};

use crate::{
    error::ServiceError,
    models::{
        auth::AuthenticatedUser,
        redemption::{
            DailyCountsQuery, DailyRedemptionCount, PromotionRedemption, RedeemRequest,
            TodayRedemptionQuery,
        },
        user::UserRole,
    },
    services::redemption::RedemptionService,
    AppState,
};

/// POST /redemptions: clients only
pub async fn redeem(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<RedeemRequest>,
) -> Result<(StatusCode, Json<PromotionRedemption>), ServiceError> {
    let client_id = user.require_client()?;
    let redemption = RedemptionService::redeem(
        &state.db,
        client_id,
        &body,
        state.config.redemption_failure_policy,
        Local::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(redemption)))
}

/// GET /redemptions/today?promotion_id=
pub async fn redeemed_today(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<TodayRedemptionQuery>,
) -> Result<Json<Value>, ServiceError> {
    let client_id = user.require_client()?;
    let redeemed =
        RedemptionService::check_today_redemption(&state.db, params.promotion_id, client_id, Local::now())
            .await?;
    Ok(Json(json!({ "promotion_id": params.promotion_id, "redeemed_today": redeemed })))
}

/// GET /redemptions: a client's history, or what a business received
pub async fn list_redemptions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<PromotionRedemption>>, ServiceError> {
    let rows = match user.role {
        UserRole::Client => RedemptionService::list_for_client(&state.db, user.user_id).await?,
        UserRole::Business => RedemptionService::list_for_business(&state.db, user.user_id).await?,
        UserRole::ServiceRole => return Err(ServiceError::Forbidden),
    };
    Ok(Json(rows))
}

/// GET /redemptions/daily?days=30: business dashboard series
pub async fn daily_counts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<DailyCountsQuery>,
) -> Result<Json<Vec<DailyRedemptionCount>>, ServiceError> {
    let business_id = user.require_business()?;
    RedemptionService::daily_counts(
        &state.db,
        business_id,
        params.days.unwrap_or(30),
        Local::now().date_naive(),
    )
    .await
    .map(Json)
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ServiceError,
    models::{
        auth::AuthenticatedUser,
        promotion::{CreatePromotionRequest, Promotion, SetActiveRequest, UpdatePromotionRequest},
    },
    services::{expiry::today_utc, promotion::PromotionService},
    AppState,
};

/// GET /promotions: promotions redeemable today
pub async fn list_active(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Promotion>>, ServiceError> {
    PromotionService::list_active(&state.db, today_utc())
        .await
        .map(Json)
}

/// GET /businesses/{id}/promotions
pub async fn list_for_business(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(business_id): Path<Uuid>,
) -> Result<Json<Vec<Promotion>>, ServiceError> {
    PromotionService::list_for_business(&state.db, business_id)
        .await
        .map(Json)
}

/// POST /promotions: business accounts only
pub async fn create_promotion(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreatePromotionRequest>,
) -> Result<(StatusCode, Json<Promotion>), ServiceError> {
    let business_id = user.require_business()?;
    let promotion = PromotionService::create(&state.db, business_id, &body).await?;
    Ok((StatusCode::CREATED, Json(promotion)))
}

/// PUT /promotions/{id}: owner only
pub async fn update_promotion(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePromotionRequest>,
) -> Result<Json<Promotion>, ServiceError> {
    let business_id = user.require_business()?;
    PromotionService::update(&state.db, business_id, id, &body)
        .await
        .map(Json)
}

/// POST /promotions/{id}/active: owner only
pub async fn set_active(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SetActiveRequest>,
) -> Result<Json<Promotion>, ServiceError> {
    let business_id = user.require_business()?;
    PromotionService::set_active(&state.db, business_id, id, body.is_active)
        .await
        .map(Json)
}

/// DELETE /promotions/{id}: owner only
pub async fn delete_promotion(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    let business_id = user.require_business()?;
    PromotionService::delete(&state.db, business_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::ServiceError,
    models::{
        auth::AuthenticatedUser,
        business::{Business, BusinessListQuery, UpsertBusinessRequest},
    },
    services::{business::BusinessService, follow::FollowService},
    AppState,
};

/// GET /businesses?category=
pub async fn list_businesses(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(params): Query<BusinessListQuery>,
) -> Result<Json<Vec<Business>>, ServiceError> {
    BusinessService::list(&state.db, params.category.as_deref())
        .await
        .map(Json)
}

/// GET /businesses/{id}
pub async fn get_business(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Business>, ServiceError> {
    BusinessService::get(&state.db, id).await.map(Json)
}

/// PUT /businesses/me: business accounts only
pub async fn upsert_my_business(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpsertBusinessRequest>,
) -> Result<Json<Business>, ServiceError> {
    let business_id = user.require_business()?;
    BusinessService::upsert_own(&state.db, business_id, &body)
        .await
        .map(Json)
}

/// GET /businesses/{id}/followers/count
pub async fn follower_count(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ServiceError> {
    let count = FollowService::follower_count(&state.db, id).await?;
    Ok(Json(json!({ "business_id": id, "followers": count })))
}

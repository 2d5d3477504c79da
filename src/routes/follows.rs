use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::ServiceError,
    models::{auth::AuthenticatedUser, follow::FollowedBusiness},
    services::follow::FollowService,
    AppState,
};

/// GET /follows
pub async fn list_followed(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<FollowedBusiness>>, ServiceError> {
    let client_id = user.require_client()?;
    FollowService::list_followed(&state.db, client_id)
        .await
        .map(Json)
}

/// GET /follows/{business_id}
pub async fn is_following(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(business_id): Path<Uuid>,
) -> Result<Json<Value>, ServiceError> {
    let client_id = user.require_client()?;
    let following = FollowService::is_following(&state.db, client_id, business_id).await?;
    Ok(Json(json!({ "business_id": business_id, "following": following })))
}

/// PUT /follows/{business_id}
pub async fn follow(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(business_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    let client_id = user.require_client()?;
    FollowService::follow(&state.db, client_id, business_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /follows/{business_id}
pub async fn unfollow(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(business_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    let client_id = user.require_client()?;
    FollowService::unfollow(&state.db, client_id, business_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

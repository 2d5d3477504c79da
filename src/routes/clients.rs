use axum::{extract::State, Json};

use crate::{
    error::ServiceError,
    models::{
        auth::AuthenticatedUser,
        client::{Client, UpsertClientRequest},
    },
    services::client::ClientService,
    AppState,
};

/// GET /clients/me
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Client>, ServiceError> {
    let client_id = user.require_client()?;
    ClientService::get(&state.db, client_id).await.map(Json)
}

/// PUT /clients/me
pub async fn upsert_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpsertClientRequest>,
) -> Result<Json<Client>, ServiceError> {
    let client_id = user.require_client()?;
    ClientService::upsert_own(&state.db, client_id, &body)
        .await
        .map(Json)
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ServiceError,
    models::{auth::AuthenticatedUser, menu::MenuReservation, user::UserRole},
    services::{expiry::today_utc, reservation::ReservationService},
    AppState,
};

/// GET /reservations: a client's own, or those a business received, for today
pub async fn list_reservations(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<MenuReservation>>, ServiceError> {
    let today = today_utc();
    let rows = match user.role {
        UserRole::Client => ReservationService::list_for_client(&state.db, user.user_id, today).await?,
        UserRole::Business => {
            ReservationService::list_for_business(&state.db, user.user_id, today).await?
        }
        UserRole::ServiceRole => return Err(ServiceError::Forbidden),
    };
    Ok(Json(rows))
}

/// DELETE /reservations/{id}: the reserving client only
pub async fn cancel_reservation(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    let client_id = user.require_client()?;
    ReservationService::cancel(&state.db, client_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ServiceError,
    models::{
        auth::AuthenticatedUser,
        menu::{CreateMenuRequest, DailyMenu, MenuListQuery, MenuReservation, UpdateMenuRequest},
    },
    services::{
        expiry::today_utc,
        menu::{BusinessMenus, MenuService},
        reservation::ReservationService,
    },
    AppState,
};

/// GET /menus?business_id=: today's menus, all authenticated users
pub async fn list_current(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(params): Query<MenuListQuery>,
) -> Result<Json<Vec<DailyMenu>>, ServiceError> {
    MenuService::list_current(&state.db, today_utc(), params.business_id)
        .await
        .map(Json)
}

/// GET /businesses/{id}/menus: the owner also sees stale menus awaiting cleanup
pub async fn list_for_business(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(business_id): Path<Uuid>,
) -> Result<Json<BusinessMenus>, ServiceError> {
    let today = today_utc();
    if user.require_business().ok() == Some(business_id) {
        return MenuService::list_for_business(&state.db, business_id, today)
            .await
            .map(Json);
    }
    let current = MenuService::list_current(&state.db, today, Some(business_id)).await?;
    Ok(Json(BusinessMenus {
        current,
        expired: Vec::new(),
    }))
}

/// POST /menus: business accounts only, always for today
pub async fn create_menu(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateMenuRequest>,
) -> Result<(StatusCode, Json<DailyMenu>), ServiceError> {
    let business_id = user.require_business()?;
    let menu = MenuService::create_for_today(&state.db, business_id, &body, today_utc()).await?;
    Ok((StatusCode::CREATED, Json(menu)))
}

/// PUT /menus/{id}: owner only
pub async fn update_menu(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMenuRequest>,
) -> Result<Json<DailyMenu>, ServiceError> {
    let business_id = user.require_business()?;
    MenuService::update(&state.db, business_id, id, &body, today_utc())
        .await
        .map(Json)
}

/// DELETE /menus/{id}: owner only
pub async fn delete_menu(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    let business_id = user.require_business()?;
    MenuService::delete(&state.db, business_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /menus/{id}/reservations: clients only
pub async fn reserve_menu(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(menu_id): Path<Uuid>,
) -> Result<(StatusCode, Json<MenuReservation>), ServiceError> {
    let client_id = user.require_client()?;
    let reservation = ReservationService::reserve(&state.db, client_id, menu_id, today_utc()).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

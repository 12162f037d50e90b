use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::{
    controllers::{ApiJson, ApiPath},
    error::AppResult,
    middleware::AuthUser,
    models::reservation::{Reservation, ReservationInput, ReservationUpdate},
    AppState,
};

// Все маршруты требуют авторизации и видят только брони текущего пользователя
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reservations/", get(list_reservations).post(create_reservation))
        .route(
            "/reservations/{id}/",
            get(retrieve_reservation)
                .put(update_reservation)
                .patch(partial_update_reservation)
                .delete(delete_reservation),
        )
}

// GET /reservations/
async fn list_reservations(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<Vec<Reservation>>> {
    Ok(Json(Reservation::list_for_user(user.user_id, &state.db).await?))
}

// GET /reservations/{id}/
async fn retrieve_reservation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(Reservation::find_for_user(id, user.user_id, &state.db).await?))
}

// POST /reservations/
async fn create_reservation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(input): ApiJson<ReservationInput>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = Reservation::create(user.user_id, input, &state.db).await?;
    info!("Reservation {} created for user {}", reservation.id, user.user_id);
    Ok((StatusCode::CREATED, Json(reservation)))
}

// PUT /reservations/{id}/
async fn update_reservation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(Reservation::update(id, user.user_id, input, &state.db).await?))
}

// PATCH /reservations/{id}/
async fn partial_update_reservation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<ReservationInput>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(Reservation::partial_update(id, user.user_id, input, &state.db).await?))
}

// DELETE /reservations/{id}/
async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    Reservation::delete_for_user(id, user.user_id, &state.db).await?;
    info!("Reservation {} deleted by user {}", id, user.user_id);
    Ok(StatusCode::NO_CONTENT)
}

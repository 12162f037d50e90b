use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::{
    controllers::{ApiJson, ApiPath},
    error::AppResult,
    middleware::AuthUser,
    models::theatre_hall::{TheatreHall, TheatreHallInput, TheatreHallPatch},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/theatrehalls/", get(list_theatre_halls).post(create_theatre_hall))
        .route(
            "/theatrehalls/{id}/",
            get(retrieve_theatre_hall)
                .put(update_theatre_hall)
                .patch(partial_update_theatre_hall)
                .delete(delete_theatre_hall),
        )
}

// GET /theatrehalls/
async fn list_theatre_halls(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<TheatreHall>>> {
    Ok(Json(TheatreHall::list(&state.db).await?))
}

// GET /theatrehalls/{id}/
async fn retrieve_theatre_hall(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<TheatreHall>> {
    Ok(Json(TheatreHall::find(id, &state.db).await?))
}

// POST /theatrehalls/
async fn create_theatre_hall(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(input): ApiJson<TheatreHallInput>,
) -> AppResult<(StatusCode, Json<TheatreHall>)> {
    let theatre_hall = TheatreHall::create(input, &state.db).await?;
    info!("Theatre hall {} created by user {}", theatre_hall.id, user.user_id);
    Ok((StatusCode::CREATED, Json(theatre_hall)))
}

// PUT /theatrehalls/{id}/
async fn update_theatre_hall(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<TheatreHallInput>,
) -> AppResult<Json<TheatreHall>> {
    Ok(Json(TheatreHall::update(id, input, &state.db).await?))
}

// PATCH /theatrehalls/{id}/
async fn partial_update_theatre_hall(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<TheatreHallPatch>,
) -> AppResult<Json<TheatreHall>> {
    Ok(Json(TheatreHall::partial_update(id, patch, &state.db).await?))
}

// DELETE /theatrehalls/{id}/
async fn delete_theatre_hall(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    TheatreHall::delete(id, &state.db).await?;
    info!("Theatre hall {} deleted by user {}", id, user.user_id);
    Ok(StatusCode::NO_CONTENT)
}

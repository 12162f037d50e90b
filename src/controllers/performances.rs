use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::{
    controllers::{ApiJson, ApiPath},
    error::AppResult,
    middleware::AuthUser,
    models::performance::{Performance, PerformanceInput, PerformancePatch},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/performances/", get(list_performances).post(create_performance))
        .route(
            "/performances/{id}/",
            get(retrieve_performance)
                .put(update_performance)
                .patch(partial_update_performance)
                .delete(delete_performance),
        )
}

// GET /performances/
async fn list_performances(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Performance>>> {
    Ok(Json(Performance::list(&state.db).await?))
}

// GET /performances/{id}/
async fn retrieve_performance(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Performance>> {
    Ok(Json(Performance::find(id, &state.db).await?))
}

// POST /performances/ (пьеса и зал должны существовать)
async fn create_performance(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(input): ApiJson<PerformanceInput>,
) -> AppResult<(StatusCode, Json<Performance>)> {
    let performance = Performance::create(input, &state.db).await?;
    info!("Performance {} created by user {}", performance.id, user.user_id);
    Ok((StatusCode::CREATED, Json(performance)))
}

// PUT /performances/{id}/
async fn update_performance(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<PerformanceInput>,
) -> AppResult<Json<Performance>> {
    Ok(Json(Performance::update(id, input, &state.db).await?))
}

// PATCH /performances/{id}/
async fn partial_update_performance(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<PerformancePatch>,
) -> AppResult<Json<Performance>> {
    Ok(Json(Performance::partial_update(id, patch, &state.db).await?))
}

// DELETE /performances/{id}/
async fn delete_performance(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    Performance::delete(id, &state.db).await?;
    info!("Performance {} deleted by user {}", id, user.user_id);
    Ok(StatusCode::NO_CONTENT)
}

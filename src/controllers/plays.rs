use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::{
    controllers::{ApiJson, ApiPath},
    error::AppResult,
    middleware::AuthUser,
    models::play::{Play, PlayDetail, PlayInput, PlayListItem, PlayPatch},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/plays/", get(list_plays).post(create_play))
        .route(
            "/plays/{id}/",
            get(retrieve_play)
                .put(update_play)
                .patch(partial_update_play)
                .delete(delete_play),
        )
}

// GET /plays/ : жанры и актёры отдаются именами
async fn list_plays(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<PlayListItem>>> {
    Ok(Json(Play::list(&state.db).await?))
}

// GET /plays/{id}/ : жанры и актёры отдаются идентификаторами
async fn retrieve_play(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<PlayDetail>> {
    Ok(Json(Play::find(id, &state.db).await?))
}

// POST /plays/
async fn create_play(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(input): ApiJson<PlayInput>,
) -> AppResult<(StatusCode, Json<PlayDetail>)> {
    let play = Play::create(input, &state.db).await?;
    info!(
        "Play {} created by user {} with {} genres and {} actors",
        play.id,
        user.user_id,
        play.genres.len(),
        play.actors.len()
    );
    Ok((StatusCode::CREATED, Json(play)))
}

// PUT /plays/{id}/
async fn update_play(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<PlayInput>,
) -> AppResult<Json<PlayDetail>> {
    Ok(Json(Play::update(id, input, &state.db).await?))
}

// PATCH /plays/{id}/
async fn partial_update_play(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<PlayPatch>,
) -> AppResult<Json<PlayDetail>> {
    Ok(Json(Play::partial_update(id, patch, &state.db).await?))
}

// DELETE /plays/{id}/
async fn delete_play(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    Play::delete(id, &state.db).await?;
    info!("Play {} deleted by user {} (performances cascaded)", id, user.user_id);
    Ok(StatusCode::NO_CONTENT)
}

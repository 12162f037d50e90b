use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::{
    controllers::{ApiJson, ApiPath},
    error::AppResult,
    middleware::AuthUser,
    models::genre::{Genre, GenreInput, GenrePatch},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/genres/", get(list_genres).post(create_genre))
        .route(
            "/genres/{id}/",
            get(retrieve_genre)
                .put(update_genre)
                .patch(partial_update_genre)
                .delete(delete_genre),
        )
}

// GET /genres/
async fn list_genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(Genre::list(&state.db).await?))
}

// GET /genres/{id}/
async fn retrieve_genre(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Genre>> {
    Ok(Json(Genre::find(id, &state.db).await?))
}

// POST /genres/
async fn create_genre(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(input): ApiJson<GenreInput>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    let genre = Genre::create(input, &state.db).await?;
    info!("Genre {} created by user {}", genre.id, user.user_id);
    Ok((StatusCode::CREATED, Json(genre)))
}

// PUT /genres/{id}/
async fn update_genre(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<GenreInput>,
) -> AppResult<Json<Genre>> {
    Ok(Json(Genre::update(id, input, &state.db).await?))
}

// PATCH /genres/{id}/
async fn partial_update_genre(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<GenrePatch>,
) -> AppResult<Json<Genre>> {
    Ok(Json(Genre::partial_update(id, patch, &state.db).await?))
}

// DELETE /genres/{id}/
async fn delete_genre(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    Genre::delete(id, &state.db).await?;
    info!("Genre {} deleted by user {}", id, user.user_id);
    Ok(StatusCode::NO_CONTENT)
}

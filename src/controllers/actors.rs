use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::{
    controllers::{ApiJson, ApiPath},
    error::AppResult,
    middleware::AuthUser,
    models::actor::{Actor, ActorInput, ActorPatch},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/actors/", get(list_actors).post(create_actor))
        .route(
            "/actors/{id}/",
            get(retrieve_actor)
                .put(update_actor)
                .patch(partial_update_actor)
                .delete(delete_actor),
        )
}

// GET /actors/
async fn list_actors(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Actor>>> {
    Ok(Json(Actor::list(&state.db).await?))
}

// GET /actors/{id}/
async fn retrieve_actor(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Actor>> {
    Ok(Json(Actor::find(id, &state.db).await?))
}

// POST /actors/
async fn create_actor(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(input): ApiJson<ActorInput>,
) -> AppResult<(StatusCode, Json<Actor>)> {
    let actor = Actor::create(input, &state.db).await?;
    info!("Actor {} created by user {}", actor.id, user.user_id);
    Ok((StatusCode::CREATED, Json(actor)))
}

// PUT /actors/{id}/
async fn update_actor(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<ActorInput>,
) -> AppResult<Json<Actor>> {
    Ok(Json(Actor::update(id, input, &state.db).await?))
}

// PATCH /actors/{id}/
async fn partial_update_actor(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<ActorPatch>,
) -> AppResult<Json<Actor>> {
    Ok(Json(Actor::partial_update(id, patch, &state.db).await?))
}

// DELETE /actors/{id}/
async fn delete_actor(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    Actor::delete(id, &state.db).await?;
    info!("Actor {} deleted by user {}", id, user.user_id);
    Ok(StatusCode::NO_CONTENT)
}

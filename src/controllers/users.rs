use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    controllers::ApiJson,
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::user::{Credentials, User},
    services::auth::IssuedToken,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/register/", post(register))
        .route("/users/token/", post(obtain_token))
        .route("/users/me/", get(me))
}

// POST /users/register/
async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> AppResult<(StatusCode, Json<User>)> {
    credentials.validate()?;

    let password_hash = state.auth.hash_password(&credentials.password).await?;
    let user = User::create(&credentials.email, &password_hash, &state.db).await?;

    info!("User {} registered", user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

// POST /users/token/
async fn obtain_token(
    State(state): State<Arc<AppState>>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> AppResult<Json<IssuedToken>> {
    let user = match User::find_by_email(&credentials.email, &state.db).await? {
        Some(user) if user.is_active => state
            .auth
            .verify_password(&credentials.password, &user.password_hash)
            .await
            .then_some(user),
        _ => None,
    };
    let user = user.ok_or_else(|| {
        warn!("Failed login attempt for {}", credentials.email);
        AppError::Unauthorized("No active account found with the given credentials".to_string())
    })?;

    Ok(Json(state.auth.issue_token(user.id)?))
}

// GET /users/me/
async fn me(State(state): State<Arc<AppState>>, user: AuthUser) -> AppResult<Json<User>> {
    let user = User::find_active(user.user_id, &state.db)
        .await?
        .ok_or_else(AppError::unauthorized)?;
    Ok(Json(user))
}

pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub auth: services::AuthService,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let db = database::Database::new(&config.database).await?;

        db.run_migrations().await?;

        Ok(Self::from_parts(db, config))
    }

    /// Состояние поверх уже готового подключения (тесты, внешние пулы).
    pub fn from_parts(db: database::Database, config: config::Config) -> Arc<Self> {
        let auth = services::AuthService::from_config(&config.jwt);
        Arc::new(Self { db, auth, config })
    }
}

/// Главный роутер приложения.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Theatre API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .merge(controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

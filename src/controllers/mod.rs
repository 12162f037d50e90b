pub mod actors;
pub mod genres;
pub mod performances;
pub mod plays;
pub mod reservations;
pub mod theatre_halls;
pub mod tickets;
pub mod users;

use axum::{
    extract::{FromRequest, FromRequestParts},
    Router,
};
use std::sync::Arc;

use crate::{error::AppError, AppState};

/// JSON-тело, ошибки разбора которого отдаются как 400 в общем формате.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Параметр пути; нечисловой id отвечает 404.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(genres::routes())
        .merge(actors::routes())
        .merge(plays::routes())
        .merge(theatre_halls::routes())
        .merge(performances::routes())
        .merge(reservations::routes())
        .merge(tickets::routes())
        .merge(users::routes())
}

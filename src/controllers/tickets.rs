use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::{
    controllers::{ApiJson, ApiPath},
    error::AppResult,
    middleware::AuthUser,
    models::ticket::{Ticket, TicketInput, TicketPatch},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tickets/", get(list_tickets).post(create_ticket))
        .route(
            "/tickets/{id}/",
            get(retrieve_ticket)
                .put(update_ticket)
                .patch(partial_update_ticket)
                .delete(delete_ticket),
        )
}

// GET /tickets/
async fn list_tickets(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Ticket>>> {
    Ok(Json(Ticket::list(&state.db).await?))
}

// GET /tickets/{id}/
async fn retrieve_ticket(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Ticket>> {
    Ok(Json(Ticket::find(id, &state.db).await?))
}

// POST /tickets/
async fn create_ticket(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(input): ApiJson<TicketInput>,
) -> AppResult<(StatusCode, Json<Ticket>)> {
    let ticket = Ticket::create(input, user.user_id, &state.db).await?;
    info!(
        "Ticket {} (performance {}, row {}, seat {}) created by user {}",
        ticket.id, ticket.performance, ticket.row, ticket.seat, user.user_id
    );
    Ok((StatusCode::CREATED, Json(ticket)))
}

// PUT /tickets/{id}/
async fn update_ticket(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<TicketInput>,
) -> AppResult<Json<Ticket>> {
    Ok(Json(Ticket::update(id, input, user.user_id, &state.db).await?))
}

// PATCH /tickets/{id}/
async fn partial_update_ticket(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<TicketPatch>,
) -> AppResult<Json<Ticket>> {
    Ok(Json(Ticket::partial_update(id, patch, user.user_id, &state.db).await?))
}

// DELETE /tickets/{id}/
async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    Ticket::delete(id, user.user_id, &state.db).await?;
    info!("Ticket {} deleted by user {}", id, user.user_id);
    Ok(StatusCode::NO_CONTENT)
}

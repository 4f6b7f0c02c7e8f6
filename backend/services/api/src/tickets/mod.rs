pub mod card;
pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::post;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tickets/rank", post(handlers::rank_tickets))
        .route("/tickets/card", post(handlers::ticket_card))
}

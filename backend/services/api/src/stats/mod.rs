pub mod handlers;
pub mod responses;

use axum::routing::post;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/ticket-stats", post(handlers::ticket_stats))
}

use axum::extract::{Query, State};
use axum::Json;
use nextup_triage::engine::RankOutcome;
use nextup_triage::rank_batch;
use serde_json::Value;

use crate::error::ApiError;
use crate::tickets::card::construct_ticket_card;
use crate::tickets::requests::RankQuery;
use crate::tickets::responses::RankResponse;
use crate::AppState;

fn rank(state: &AppState, query: &RankQuery, batch: &Value) -> Result<RankOutcome, ApiError> {
    let top_n = query.top_n.unwrap_or(state.top_n);
    let now = (state.clock)();
    Ok(rank_batch(&state.policy, batch, now, top_n)?)
}

pub async fn rank_tickets(
    State(state): State<AppState>,
    Query(query): Query<RankQuery>,
    Json(batch): Json<Value>,
) -> Result<Json<RankResponse>, ApiError> {
    let outcome = rank(&state, &query, &batch)?;
    let count = outcome.ranked.len();
    Ok(Json(RankResponse {
        data: outcome.ranked,
        count,
        candidates: outcome.candidates,
        rejected: outcome.rejected,
        failed: outcome.failed,
    }))
}

pub async fn ticket_card(
    State(state): State<AppState>,
    Query(query): Query<RankQuery>,
    Json(batch): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let outcome = rank(&state, &query, &batch)?;
    Ok(Json(construct_ticket_card(
        &outcome.ranked,
        &state.policy,
        &state.ticket_url_template,
    )))
}

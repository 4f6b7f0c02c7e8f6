use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nextup_common::error::NextupError;
use nextup_source::filter_excluded_queues;
use nextup_triage::rank_batch;
use serde_json::Value;

use crate::command::requests::CommandRequest;
use crate::command::responses::{NextTicketResponse, TicketSummary, UnknownCommandResponse};
use crate::error::ApiError;
use crate::tickets::card::construct_ticket_card;
use crate::AppState;

pub async fn handle_command(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> Result<Response, ApiError> {
    let (Some(text), Some(sender)) = (request.command_text(), request.sender_id()) else {
        return Err(NextupError::Validation("missing required fields: text, from.aadObjectId".to_string()).into());
    };

    if !request.is_next_ticket() {
        tracing::info!(command = text, "unknown command");
        return Ok(Json(UnknownCommandResponse {
            response: "Unknown command",
        })
        .into_response());
    }

    tracing::debug!(
        sender,
        service_url = request.service_url.as_deref(),
        conversation = request.conversation.as_ref().and_then(|c| c.id.as_deref()),
        "next ticket requested"
    );
    let response = next_ticket(&state, sender).await?;
    Ok(Json(response).into_response())
}

async fn next_ticket(state: &AppState, sender: &str) -> Result<NextTicketResponse, ApiError> {
    let source = state
        .source
        .as_ref()
        .ok_or_else(|| NextupError::Config("ticket webhook is not configured".to_string()))?;

    let raw = source
        .fetch_tickets(sender)
        .await
        .map_err(NextupError::from)?;
    let raw = filter_excluded_queues(raw, &state.excluded_queues);

    let outcome = rank_batch(&state.policy, &Value::Array(raw), (state.clock)(), state.top_n)?;

    let tickets: Vec<TicketSummary> = outcome
        .ranked
        .iter()
        .map(|w| TicketSummary {
            ticket_id: w.ticket.id,
            title: w.ticket.title.clone(),
            points: w.weight,
        })
        .collect();

    tracing::info!(
        sender,
        candidates = outcome.candidates,
        picked = ?tickets.iter().map(|t| t.ticket_id).collect::<Vec<_>>(),
        "next ticket selected"
    );

    let card = construct_ticket_card(&outcome.ranked, &state.policy, &state.ticket_url_template);

    Ok(NextTicketResponse {
        status: "success",
        tickets,
        card,
    })
}

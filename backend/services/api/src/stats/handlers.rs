use axum::Json;
use nextup_triage::batch_stats;
use serde_json::Value;

use crate::error::ApiError;
use crate::stats::responses::TicketStatsResponse;

pub async fn ticket_stats(Json(batch): Json<Value>) -> Result<Json<TicketStatsResponse>, ApiError> {
    let data = batch_stats(&batch)?;
    tracing::debug!(total = data.total_tickets, "computed ticket stats");
    Ok(Json(TicketStatsResponse { data }))
}

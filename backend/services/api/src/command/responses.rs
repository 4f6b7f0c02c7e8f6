use serde::Serialize;
use serde_json::Value;

/// One line of the selection summary, in the shape the command log uses.
#[derive(Debug, Serialize)]
pub struct TicketSummary {
    pub ticket_id: i64,
    pub title: Option<String>,
    pub points: i64,
}

#[derive(Debug, Serialize)]
pub struct NextTicketResponse {
    pub status: &'static str,
    pub tickets: Vec<TicketSummary>,
    pub card: Value,
}

#[derive(Debug, Serialize)]
pub struct UnknownCommandResponse {
    pub response: &'static str,
}

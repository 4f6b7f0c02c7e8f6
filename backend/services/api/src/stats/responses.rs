use nextup_triage::TicketStats;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TicketStatsResponse {
    pub data: TicketStats,
}

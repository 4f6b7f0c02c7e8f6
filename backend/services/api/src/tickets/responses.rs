use nextup_triage::engine::{FailedTicket, WeightedTicket};
use nextup_triage::ticket::RejectedRecord;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub data: Vec<WeightedTicket>,
    pub count: usize,
    pub candidates: usize,
    pub rejected: Vec<RejectedRecord>,
    pub failed: Vec<FailedTicket>,
}

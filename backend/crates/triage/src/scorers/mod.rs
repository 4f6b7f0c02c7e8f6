pub mod age;
pub mod due_soon;
pub mod priority;
pub mod sla;
pub mod status;

use chrono::{DateTime, Utc};

use crate::error::ScoreError;
use crate::sla::SlaResult;
use crate::ticket::TicketRecord;
use crate::trace::ScorerResult;

/// Everything a scorer may look at. SLA results are evaluated once per
/// ticket and shared by every scorer that needs them.
pub struct ScoringContext<'a> {
    pub ticket: &'a TicketRecord,
    pub now: DateTime<Utc>,
    pub sla_results: &'a [SlaResult],
}

pub trait Scorer {
    fn name(&self) -> &'static str;
    fn score(&self, ctx: &ScoringContext<'_>) -> Result<ScorerResult, ScoreError>;
}

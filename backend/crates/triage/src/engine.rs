use chrono::{DateTime, Utc};
use nextup_common::error::NextupResult;
use serde::Serialize;
use serde_json::Value;

use crate::config::RankingPolicy;
use crate::error::ScoreError;
use crate::scorers::age::AgeScorer;
use crate::scorers::due_soon::DueSoonScorer;
use crate::scorers::priority::PriorityScorer;
use crate::scorers::sla::SlaPenaltyScorer;
use crate::scorers::status::StatusScorer;
use crate::scorers::{Scorer, ScoringContext};
use crate::sla::{evaluate_ticket_slas, SlaResult};
use crate::ticket::{parse_batch, RejectedRecord, TicketRecord};
use crate::trace::{ScorerResult, WeightTrace};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedTicket {
    #[serde(flatten)]
    pub ticket: TicketRecord,
    pub weight: i64,
    pub sla_results: Vec<SlaResult>,
    pub trace: WeightTrace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTicket {
    pub id: i64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankOutcome {
    pub ranked: Vec<WeightedTicket>,
    /// Tickets that made it through validation and scoring.
    pub candidates: usize,
    pub rejected: Vec<RejectedRecord>,
    pub failed: Vec<FailedTicket>,
}

fn build_scorers(policy: &RankingPolicy) -> Vec<Box<dyn Scorer + '_>> {
    let mut scorers: Vec<Box<dyn Scorer + '_>> = vec![
        Box::new(PriorityScorer {
            levels: &policy.priorities,
        }),
        Box::new(StatusScorer {
            levels: &policy.statuses,
            unknown_weight: policy.unknown_status_weight,
        }),
        Box::new(SlaPenaltyScorer {
            penalty: policy.sla_unmet_penalty,
        }),
        Box::new(AgeScorer {
            points_per_day: policy.age_points_per_day,
        }),
    ];

    if let Some(config) = policy.due_soon {
        scorers.push(Box::new(DueSoonScorer { config }));
    }

    scorers
}

fn weigh(
    scorers: &[Box<dyn Scorer + '_>],
    policy: &RankingPolicy,
    ticket: &TicketRecord,
    now: DateTime<Utc>,
) -> Result<WeightedTicket, ScoreError> {
    let sla_results = evaluate_ticket_slas(ticket, now, policy.display_timezone);

    let ctx = ScoringContext {
        ticket,
        now,
        sla_results: &sla_results,
    };

    let results = scorers
        .iter()
        .map(|s| s.score(&ctx))
        .collect::<Result<Vec<ScorerResult>, ScoreError>>()?;

    let mut total: i64 = 0;
    for r in &results {
        total = total
            .checked_add(r.points)
            .ok_or(ScoreError::Overflow { rule: "total" })?;
    }

    Ok(WeightedTicket {
        ticket: ticket.clone(),
        weight: total,
        sla_results,
        trace: WeightTrace {
            scorers: results,
            total,
        },
    })
}

/// Compute one ticket's weight under `policy` at instant `now`.
pub fn score_ticket(
    policy: &RankingPolicy,
    ticket: &TicketRecord,
    now: DateTime<Utc>,
) -> Result<WeightedTicket, ScoreError> {
    let scorers = build_scorers(policy);
    weigh(&scorers, policy, ticket, now)
}

fn rank_with_failures(
    policy: &RankingPolicy,
    tickets: &[TicketRecord],
    now: DateTime<Utc>,
) -> (Vec<WeightedTicket>, Vec<FailedTicket>) {
    let scorers = build_scorers(policy);
    let mut weighted = Vec::with_capacity(tickets.len());
    let mut failed = Vec::new();

    for ticket in tickets {
        match weigh(&scorers, policy, ticket, now) {
            Ok(w) => weighted.push(w),
            Err(e) => {
                tracing::error!(ticket_id = ticket.id, error = %e, "skipping ticket, weight computation failed");
                failed.push(FailedTicket {
                    id: ticket.id,
                    reason: e.to_string(),
                });
            }
        }
    }

    // Vec::sort_by is stable: equal weights keep their input order.
    weighted.sort_by(|a, b| b.weight.cmp(&a.weight));
    (weighted, failed)
}

/// Rank tickets by descending weight and keep the first `top_n`.
///
/// Tickets whose weight cannot be computed are logged and left out; the
/// rest of the batch is still ranked.
pub fn rank_tickets(
    policy: &RankingPolicy,
    tickets: &[TicketRecord],
    now: DateTime<Utc>,
    top_n: usize,
) -> Vec<WeightedTicket> {
    let (mut ranked, _) = rank_with_failures(policy, tickets, now);
    ranked.truncate(top_n);
    ranked
}

/// Validate a raw upstream batch and rank it.
///
/// Fails only when `batch` is not a JSON array.
pub fn rank_batch(
    policy: &RankingPolicy,
    batch: &Value,
    now: DateTime<Utc>,
    top_n: usize,
) -> NextupResult<RankOutcome> {
    let parsed = parse_batch(batch)?;
    let (mut ranked, failed) = rank_with_failures(policy, &parsed.tickets, now);
    let candidates = ranked.len();
    ranked.truncate(top_n);

    tracing::debug!(
        candidates,
        rejected = parsed.rejected.len(),
        failed = failed.len(),
        top_n,
        "ranked ticket batch"
    );

    Ok(RankOutcome {
        ranked,
        candidates,
        rejected: parsed.rejected,
        failed,
    })
}

use crate::config::PriorityLevel;
use crate::error::ScoreError;
use crate::trace::ScorerResult;

use super::{Scorer, ScoringContext};

pub struct PriorityScorer<'a> {
    pub levels: &'a [PriorityLevel],
}

impl Scorer for PriorityScorer<'_> {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<ScorerResult, ScoreError> {
        let level = ctx
            .ticket
            .priority
            .and_then(|code| self.levels.iter().find(|l| l.code == code));

        let (points, detail) = match (ctx.ticket.priority, level) {
            (_, Some(level)) => (level.weight, format!("priority={} ({})", level.code, level.label)),
            (Some(code), None) => (0, format!("priority={code} (unknown)")),
            (None, None) => (0, "priority missing".to_string()),
        };

        Ok(ScorerResult {
            rule: self.name().to_string(),
            points,
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RankingPolicy;
    use crate::ticket::TicketRecord;
    use chrono::Utc;

    fn points(priority: Option<i64>) -> i64 {
        let policy = RankingPolicy::default();
        let scorer = PriorityScorer {
            levels: &policy.priorities,
        };
        let ticket = TicketRecord {
            priority,
            ..TicketRecord::new(1)
        };
        let ctx = ScoringContext {
            ticket: &ticket,
            now: Utc::now(),
            sla_results: &[],
        };
        scorer.score(&ctx).unwrap().points
    }

    #[test]
    fn critical_outranks_very_low() {
        assert_eq!(points(Some(1)), 5);
        assert_eq!(points(Some(5)), 1);
    }

    #[test]
    fn unknown_or_missing_priority_is_zero() {
        assert_eq!(points(Some(42)), 0);
        assert_eq!(points(None), 0);
    }
}

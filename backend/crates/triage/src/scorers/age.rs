use crate::error::ScoreError;
use crate::trace::ScorerResult;

use super::{Scorer, ScoringContext};

const SECONDS_PER_DAY: i64 = 86_400;

/// Older tickets drift upward: whole days since creation times a per-day rate.
pub struct AgeScorer {
    pub points_per_day: i64,
}

impl Scorer for AgeScorer {
    fn name(&self) -> &'static str {
        "age"
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<ScorerResult, ScoreError> {
        let Some(created) = ctx.ticket.create_date else {
            tracing::warn!(ticket_id = ctx.ticket.id, "no usable createDate, age contributes 0");
            return Ok(ScorerResult {
                rule: self.name().to_string(),
                points: 0,
                detail: "createDate missing".to_string(),
            });
        };

        // Future creation dates (clock skew upstream) count as brand new.
        let days = (ctx.now - created)
            .num_seconds()
            .div_euclid(SECONDS_PER_DAY)
            .max(0);

        let points = days
            .checked_mul(self.points_per_day)
            .ok_or(ScoreError::Overflow { rule: self.name() })?;

        Ok(ScorerResult {
            rule: self.name().to_string(),
            points,
            detail: format!("{days} day(s) old"),
        })
    }
}

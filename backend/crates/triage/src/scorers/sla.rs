use crate::error::ScoreError;
use crate::trace::ScorerResult;

use super::{Scorer, ScoringContext};

/// Adds a fixed penalty for every applicable SLA dimension that is not met.
pub struct SlaPenaltyScorer {
    pub penalty: i64,
}

impl Scorer for SlaPenaltyScorer {
    fn name(&self) -> &'static str {
        "sla_unmet"
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<ScorerResult, ScoreError> {
        let unmet: Vec<&str> = ctx
            .sla_results
            .iter()
            .filter(|r| !r.sla_met)
            .map(|r| r.sla_name.as_str())
            .collect();

        let points = self
            .penalty
            .checked_mul(unmet.len() as i64)
            .ok_or(ScoreError::Overflow { rule: self.name() })?;

        let detail = if unmet.is_empty() {
            format!("{} applicable, none unmet", ctx.sla_results.len())
        } else {
            format!("unmet: {}", unmet.join(", "))
        };

        Ok(ScorerResult {
            rule: self.name().to_string(),
            points,
            detail,
        })
    }
}

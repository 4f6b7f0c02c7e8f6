use crate::config::StatusLevel;
use crate::error::ScoreError;
use crate::trace::ScorerResult;

use super::{Scorer, ScoringContext};

pub struct StatusScorer<'a> {
    pub levels: &'a [StatusLevel],
    pub unknown_weight: i64,
}

impl Scorer for StatusScorer<'_> {
    fn name(&self) -> &'static str {
        "status"
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<ScorerResult, ScoreError> {
        // Unclassified tickets (unknown code, or no readable status) get a
        // nudge so they are not buried.
        let (points, detail) = match ctx.ticket.status {
            Some(code) => match self.levels.iter().find(|l| l.code == code) {
                Some(level) => (level.weight, format!("status={code} ({})", level.label)),
                None => (self.unknown_weight, format!("status={code} (unknown)")),
            },
            None => (self.unknown_weight, "status missing".to_string()),
        };

        Ok(ScorerResult {
            rule: self.name().to_string(),
            points,
            detail,
        })
    }
}

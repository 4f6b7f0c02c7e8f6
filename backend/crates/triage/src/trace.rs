use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerResult {
    pub rule: String,
    pub points: i64,
    pub detail: String,
}

/// How a ticket's weight was assembled, one entry per scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTrace {
    pub scorers: Vec<ScorerResult>,
    pub total: i64,
}

impl WeightTrace {
    pub fn points_for(&self, rule: &str) -> Option<i64> {
        self.scorers.iter().find(|s| s.rule == rule).map(|s| s.points)
    }
}

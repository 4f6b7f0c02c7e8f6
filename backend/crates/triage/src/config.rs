use std::collections::HashSet;
use std::path::Path;

use chrono_tz::Tz;
use nextup_common::error::{NextupError, NextupResult};
use serde::{Deserialize, Serialize};

pub const POLICY_VERSION: u32 = 1;

/// One row of the priority table. `color` is an Adaptive Card text color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityLevel {
    pub code: i64,
    pub label: String,
    pub weight: i64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLevel {
    pub code: i64,
    pub label: String,
    pub weight: i64,
}

/// Optional bonus for SLA deadlines that are still open and close to due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueSoonBonus {
    pub window_minutes: i64,
    pub bonus: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingPolicy {
    pub version: u32,
    pub priorities: Vec<PriorityLevel>,
    pub statuses: Vec<StatusLevel>,
    pub unknown_status_weight: i64,
    pub sla_unmet_penalty: i64,
    pub age_points_per_day: i64,
    pub due_soon: Option<DueSoonBonus>,
    pub display_timezone: Tz,
}

fn priority(code: i64, label: &str, weight: i64, color: &str) -> PriorityLevel {
    PriorityLevel {
        code,
        label: label.to_string(),
        weight,
        color: color.to_string(),
    }
}

fn status(code: i64, label: &str, weight: i64) -> StatusLevel {
    StatusLevel {
        code,
        label: label.to_string(),
        weight,
    }
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            version: POLICY_VERSION,
            priorities: vec![
                priority(1, "Critical", 5, "attention"),
                priority(2, "High", 4, "warning"),
                priority(3, "Medium", 3, "accent"),
                priority(4, "Low", 2, "good"),
                priority(5, "Very Low", 1, "default"),
            ],
            statuses: vec![
                status(1, "New", 50),
                status(5, "Complete", -10),
                status(7, "Waiting Client", -20),
                status(8, "In Progress", 30),
                status(9, "Waiting Materials", -20),
                status(11, "Escalated", 70),
                status(12, "Waiting Vendor", -20),
                status(13, "Waiting Approval", -20),
                status(16, "On Hold", -400),
                status(19, "Assigned", 70),
            ],
            unknown_status_weight: 10,
            sla_unmet_penalty: 100,
            age_points_per_day: 10,
            due_soon: None,
            display_timezone: chrono_tz::America::Chicago,
        }
    }
}

impl RankingPolicy {
    pub fn priority(&self, code: i64) -> Option<&PriorityLevel> {
        self.priorities.iter().find(|p| p.code == code)
    }

    pub fn status(&self, code: i64) -> Option<&StatusLevel> {
        self.statuses.iter().find(|s| s.code == code)
    }

    /// Load a policy from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> NextupResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            NextupError::Config(format!("cannot read ranking policy {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> NextupResult<Self> {
        let policy: Self = serde_json::from_str(raw)
            .map_err(|e| NextupError::Config(format!("invalid ranking policy: {e}")))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> NextupResult<()> {
        if self.version != POLICY_VERSION {
            return Err(NextupError::Config(format!(
                "unsupported ranking policy version {} (expected {POLICY_VERSION})",
                self.version
            )));
        }

        let mut seen = HashSet::new();
        for p in &self.priorities {
            if !seen.insert(p.code) {
                return Err(NextupError::Config(format!(
                    "duplicate priority code {}",
                    p.code
                )));
            }
        }

        seen.clear();
        for s in &self.statuses {
            if !seen.insert(s.code) {
                return Err(NextupError::Config(format!(
                    "duplicate status code {}",
                    s.code
                )));
            }
        }

        if let Some(due_soon) = self.due_soon {
            if due_soon.window_minutes <= 0 {
                return Err(NextupError::Config(
                    "due_soon.window_minutes must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        let policy = RankingPolicy::default();
        policy.validate().expect("default policy validates");
        assert_eq!(policy.display_timezone, chrono_tz::America::Chicago);
        assert!(policy.due_soon.is_none());
    }

    #[test]
    fn default_tables_match_canonical_weights() {
        let policy = RankingPolicy::default();
        assert_eq!(policy.priority(1).map(|p| p.weight), Some(5));
        assert_eq!(policy.priority(5).map(|p| p.weight), Some(1));
        assert_eq!(policy.status(1).map(|s| s.weight), Some(50));
        assert_eq!(policy.status(11).map(|s| s.weight), Some(70));
        assert_eq!(policy.status(16).map(|s| s.weight), Some(-400));
        assert!(policy.priority(9).is_none());
        assert!(policy.status(999).is_none());
    }

    /// The unmet-SLA penalty must outweigh any priority spread.
    #[test]
    fn sla_penalty_dominates_priority_spread() {
        let policy = RankingPolicy::default();
        let max = policy.priorities.iter().map(|p| p.weight).max().unwrap();
        let min = policy.priorities.iter().map(|p| p.weight).min().unwrap();
        assert!(policy.sla_unmet_penalty > max - min);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let policy = RankingPolicy::from_json_str(
            r#"{"version": 1, "sla_unmet_penalty": 250, "due_soon": {"window_minutes": 120, "bonus": 50}}"#,
        )
        .expect("should parse");
        assert_eq!(policy.sla_unmet_penalty, 250);
        assert_eq!(policy.age_points_per_day, 10);
        assert_eq!(policy.priorities.len(), 5);
        assert_eq!(
            policy.due_soon,
            Some(DueSoonBonus {
                window_minutes: 120,
                bonus: 50
            })
        );
    }

    #[test]
    fn json_timezone_is_parsed() {
        let policy =
            RankingPolicy::from_json_str(r#"{"display_timezone": "America/New_York"}"#).unwrap();
        assert_eq!(policy.display_timezone, chrono_tz::America::New_York);
    }

    #[test]
    fn rejects_duplicate_status_codes() {
        let err = RankingPolicy::from_json_str(
            r#"{"statuses": [{"code": 1, "label": "New", "weight": 50}, {"code": 1, "label": "Again", "weight": 0}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate status code 1"));
    }

    #[test]
    fn rejects_unknown_version() {
        let err = RankingPolicy::from_json_str(r#"{"version": 7}"#).unwrap_err();
        assert!(matches!(err, NextupError::Config(_)));
    }

    #[test]
    fn rejects_non_positive_due_soon_window() {
        let result = RankingPolicy::from_json_str(
            r#"{"due_soon": {"window_minutes": 0, "bonus": 50}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = RankingPolicy::from_json_file("/nonexistent/policy.json").unwrap_err();
        assert!(matches!(err, NextupError::Config(_)));
    }
}

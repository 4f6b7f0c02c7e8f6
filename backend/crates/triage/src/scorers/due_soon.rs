use crate::config::DueSoonBonus;
use crate::error::ScoreError;
use crate::trace::ScorerResult;

use super::{Scorer, ScoringContext};

/// Policy hook: bonus for open SLA deadlines falling due within the window.
pub struct DueSoonScorer {
    pub config: DueSoonBonus,
}

impl Scorer for DueSoonScorer {
    fn name(&self) -> &'static str {
        "due_soon"
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Result<ScorerResult, ScoreError> {
        let window_secs = (self.config.window_minutes as f64) * 60.0;
        let due_soon: Vec<&str> = ctx
            .sla_results
            .iter()
            .filter(|r| !r.is_completed())
            .filter(|r| r.time_left_seconds >= 0.0 && r.time_left_seconds <= window_secs)
            .map(|r| r.sla_name.as_str())
            .collect();

        let points = self
            .config
            .bonus
            .checked_mul(due_soon.len() as i64)
            .ok_or(ScoreError::Overflow { rule: self.name() })?;

        Ok(ScorerResult {
            rule: self.name().to_string(),
            points,
            detail: if due_soon.is_empty() {
                format!("nothing due within {}m", self.config.window_minutes)
            } else {
                format!("due soon: {}", due_soon.join(", "))
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sla::evaluate_ticket_slas;
    use crate::ticket::TicketRecord;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn only_open_deadlines_inside_window_count() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let ticket = TicketRecord {
            // open, due in 90 minutes -> counts
            first_response_due_date_time: Some(now + Duration::minutes(90)),
            // completed, would otherwise be inside the window
            resolution_plan_date_time: Some(now - Duration::minutes(5)),
            resolution_plan_due_date_time: Some(now + Duration::minutes(10)),
            // open but too far out
            resolved_due_date_time: Some(now + Duration::hours(5)),
            ..TicketRecord::new(1)
        };
        let results = evaluate_ticket_slas(&ticket, now, chrono_tz::America::Chicago);
        let ctx = ScoringContext {
            ticket: &ticket,
            now,
            sla_results: &results,
        };

        let scorer = DueSoonScorer {
            config: DueSoonBonus {
                window_minutes: 120,
                bonus: 50,
            },
        };
        let r = scorer.score(&ctx).unwrap();
        assert_eq!(r.points, 50);
        assert_eq!(r.detail, "due soon: First Response");
    }

    #[test]
    fn overdue_is_not_due_soon() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let ticket = TicketRecord {
            first_response_due_date_time: Some(now - Duration::minutes(1)),
            ..TicketRecord::new(1)
        };
        let results = evaluate_ticket_slas(&ticket, now, chrono_tz::America::Chicago);
        let ctx = ScoringContext {
            ticket: &ticket,
            now,
            sla_results: &results,
        };
        let scorer = DueSoonScorer {
            config: DueSoonBonus {
                window_minutes: 120,
                bonus: 50,
            },
        };
        assert_eq!(scorer.score(&ctx).unwrap().points, 0);
    }
}

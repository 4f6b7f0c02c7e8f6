use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::ticket::TicketRecord;
use crate::timefmt::format_display;

pub const NOT_COMPLETED: &str = "Not completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaKind {
    FirstResponse,
    ResolutionPlan,
    Resolution,
}

impl SlaKind {
    pub const ALL: [SlaKind; 3] = [
        SlaKind::FirstResponse,
        SlaKind::ResolutionPlan,
        SlaKind::Resolution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlaKind::FirstResponse => "First Response",
            SlaKind::ResolutionPlan => "Resolution Plan",
            SlaKind::Resolution => "Resolution",
        }
    }

    /// The (met, due) instants this dimension reads from a ticket.
    pub fn instants(
        &self,
        ticket: &TicketRecord,
    ) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match self {
            SlaKind::FirstResponse => (
                ticket.first_response_date_time,
                ticket.first_response_due_date_time,
            ),
            SlaKind::ResolutionPlan => (
                ticket.resolution_plan_date_time,
                ticket.resolution_plan_due_date_time,
            ),
            SlaKind::Resolution => (ticket.resolved_date_time, ticket.resolved_due_date_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlaResult {
    pub kind: SlaKind,
    pub sla_name: String,
    pub sla_met: bool,
    /// `due - met` when completed, `due - now` otherwise. Positive means time to spare.
    pub time_left_seconds: f64,
    pub due_date_formatted: String,
    pub met_date_formatted: String,
    pub due_at: DateTime<Utc>,
    pub met_at: Option<DateTime<Utc>>,
}

impl SlaResult {
    pub fn is_completed(&self) -> bool {
        self.met_at.is_some()
    }
}

/// Evaluate one SLA deadline.
///
/// Returns `None` when there is no due date: the dimension does not apply.
/// All comparisons happen on UTC instants; `zone` only affects the
/// formatted strings.
pub fn evaluate_sla(
    kind: SlaKind,
    met_at: Option<DateTime<Utc>>,
    due_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    zone: Tz,
) -> Option<SlaResult> {
    let due_at = due_at?;

    let (sla_met, reference) = match met_at {
        Some(met) => (met <= due_at, met),
        None => (now <= due_at, now),
    };
    let time_left_seconds = (due_at - reference).num_milliseconds() as f64 / 1000.0;

    Some(SlaResult {
        kind,
        sla_name: kind.as_str().to_string(),
        sla_met,
        time_left_seconds,
        due_date_formatted: format_display(due_at, zone),
        met_date_formatted: met_at
            .map(|met| format_display(met, zone))
            .unwrap_or_else(|| NOT_COMPLETED.to_string()),
        due_at,
        met_at,
    })
}

/// Evaluate every applicable SLA dimension of a ticket, in dimension order.
pub fn evaluate_ticket_slas(ticket: &TicketRecord, now: DateTime<Utc>, zone: Tz) -> Vec<SlaResult> {
    SlaKind::ALL
        .iter()
        .filter_map(|kind| {
            let (met_at, due_at) = kind.instants(ticket);
            evaluate_sla(*kind, met_at, due_at, now, zone)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use chrono_tz::America::Chicago;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn no_due_date_is_not_applicable() {
        let now = at(2024, 5, 1, 12, 0);
        assert!(evaluate_sla(SlaKind::Resolution, None, None, now, Chicago).is_none());
        assert!(evaluate_sla(SlaKind::Resolution, Some(now), None, now, Chicago).is_none());
    }

    #[test]
    fn met_early_has_positive_slack() {
        let due = at(2024, 5, 1, 16, 0);
        let met = at(2024, 5, 1, 15, 30);
        let r = evaluate_sla(SlaKind::FirstResponse, Some(met), Some(due), at(2024, 5, 2, 0, 0), Chicago)
            .unwrap();
        assert!(r.sla_met);
        assert_eq!(r.time_left_seconds, 1800.0);
        assert_eq!(r.sla_name, "First Response");
        assert_eq!(r.met_date_formatted, "05-01-24 10:30 AM CDT");
        assert_eq!(r.due_date_formatted, "05-01-24 11:00 AM CDT");
    }

    #[test]
    fn met_exactly_on_deadline_counts_as_met() {
        let due = at(2024, 5, 1, 16, 0);
        let r = evaluate_sla(SlaKind::Resolution, Some(due), Some(due), due, Chicago).unwrap();
        assert!(r.sla_met);
        assert_eq!(r.time_left_seconds, 0.0);
    }

    #[test]
    fn met_late_has_negative_slack() {
        let due = at(2024, 5, 1, 16, 0);
        let met = due + Duration::hours(2);
        let r = evaluate_sla(SlaKind::Resolution, Some(met), Some(due), met, Chicago).unwrap();
        assert!(!r.sla_met);
        assert_eq!(r.time_left_seconds, -7200.0);
    }

    #[test]
    fn open_and_not_yet_due() {
        let now = at(2024, 5, 1, 12, 0);
        let due = now + Duration::minutes(45);
        let r = evaluate_sla(SlaKind::ResolutionPlan, None, Some(due), now, Chicago).unwrap();
        assert!(r.sla_met);
        assert_eq!(r.time_left_seconds, 2700.0);
        assert_eq!(r.met_date_formatted, NOT_COMPLETED);
        assert!(!r.is_completed());
    }

    #[test]
    fn open_and_overdue() {
        let now = at(2024, 5, 1, 12, 0);
        let due = now - Duration::days(1);
        let r = evaluate_sla(SlaKind::Resolution, None, Some(due), now, Chicago).unwrap();
        assert!(!r.sla_met);
        assert_eq!(r.time_left_seconds, -86_400.0);
    }

    /// 2024-11-03: clocks fall back from CDT to CST at 07:00 UTC. The met
    /// instant reads 1:30 AM CDT and the due instant 1:15 AM CST, so a
    /// wall-clock comparison would call this late. It is 45 minutes early.
    #[test]
    fn comparison_ignores_dst_wall_clock() {
        let met = at(2024, 11, 3, 6, 30);
        let due = at(2024, 11, 3, 7, 15);
        let r = evaluate_sla(SlaKind::FirstResponse, Some(met), Some(due), due, Chicago).unwrap();
        assert!(r.sla_met);
        assert_eq!(r.time_left_seconds, 2700.0);
        assert_eq!(r.met_date_formatted, "11-03-24 1:30 AM CDT");
        assert_eq!(r.due_date_formatted, "11-03-24 1:15 AM CST");
    }

    #[test]
    fn ticket_evaluation_skips_missing_dimensions() {
        let now = at(2024, 5, 1, 12, 0);
        let ticket = TicketRecord {
            first_response_date_time: Some(now),
            first_response_due_date_time: Some(now),
            resolved_due_date_time: Some(now - Duration::hours(1)),
            ..TicketRecord::new(1)
        };

        let results = evaluate_ticket_slas(&ticket, now, Chicago);
        let kinds: Vec<SlaKind> = results.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![SlaKind::FirstResponse, SlaKind::Resolution]);
        assert!(results[0].sla_met);
        assert!(!results[1].sla_met);
    }
}

use std::collections::BTreeMap;

use nextup_common::error::{NextupError, NextupResult};
use serde::Serialize;
use serde_json::Value;

use crate::ticket::RawTicket;
use crate::timefmt::parse_timestamp;

const UNKNOWN: &str = "unknown";

/// Aggregate counts over a ticket batch.
///
/// Map keys are stringified ids/labels; tickets missing the field are
/// counted under `"unknown"`. Priority counts only include tickets that
/// carry a priority.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TicketStats {
    pub total_tickets: usize,
    pub by_company: BTreeMap<String, usize>,
    pub by_contact: BTreeMap<String, usize>,
    pub sla_met_count: usize,
    pub priority_count: BTreeMap<i64, usize>,
    /// Mean of `resolvedDateTime - createDate` in hours, over tickets having both.
    pub average_resolution_time_hours: f64,
    pub resolved_tickets: usize,
    pub issue_type_count: BTreeMap<String, usize>,
    pub sub_issue_type_count: BTreeMap<String, usize>,
}

fn key_of<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Stats over a raw upstream batch. Every element counts, including records
/// the ranker would quarantine: an element that is not an object simply has
/// every field unknown.
pub fn batch_stats(value: &Value) -> NextupResult<TicketStats> {
    let items = value.as_array().ok_or_else(|| {
        NextupError::Validation("expected a JSON array of tickets".to_string())
    })?;

    let tickets: Vec<RawTicket> = items
        .iter()
        .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
        .collect();

    Ok(compute_ticket_stats(&tickets))
}

pub fn compute_ticket_stats(tickets: &[RawTicket]) -> TicketStats {
    let mut stats = TicketStats {
        total_tickets: tickets.len(),
        ..TicketStats::default()
    };
    let mut total_resolution_hours = 0.0;

    for ticket in tickets {
        *stats.by_company.entry(key_of(ticket.company_id)).or_insert(0) += 1;
        *stats.by_contact.entry(key_of(ticket.contact_id)).or_insert(0) += 1;

        if ticket.service_level_agreement_has_been_met == Some(true) {
            stats.sla_met_count += 1;
        }

        if let Some(priority) = ticket.priority {
            *stats.priority_count.entry(priority).or_insert(0) += 1;
        }

        let created = ticket.create_date.as_deref().and_then(|s| parse_timestamp(s).ok());
        let resolved = ticket
            .resolved_date_time
            .as_deref()
            .and_then(|s| parse_timestamp(s).ok());
        if let (Some(created), Some(resolved)) = (created, resolved) {
            total_resolution_hours += (resolved - created).num_seconds() as f64 / 3600.0;
            stats.resolved_tickets += 1;
        }

        *stats
            .issue_type_count
            .entry(key_of(ticket.issue_type.as_deref()))
            .or_insert(0) += 1;
        *stats
            .sub_issue_type_count
            .entry(key_of(ticket.sub_issue_type.as_deref()))
            .or_insert(0) += 1;
    }

    if stats.resolved_tickets > 0 {
        stats.average_resolution_time_hours = total_resolution_hours / stats.resolved_tickets as f64;
    }

    stats
}

use std::collections::HashSet;

use serde_json::Value;

/// Drop tickets routed to excluded queues. Tickets without a readable
/// `queueID` are kept.
pub fn filter_excluded_queues(tickets: Vec<Value>, excluded: &HashSet<i64>) -> Vec<Value> {
    if excluded.is_empty() {
        return tickets;
    }

    let before = tickets.len();
    let kept: Vec<Value> = tickets
        .into_iter()
        .filter(|t| match queue_id(t) {
            Some(q) => !excluded.contains(&q),
            None => true,
        })
        .collect();

    tracing::debug!(before, after = kept.len(), "filtered excluded queues");
    kept
}

fn queue_id(ticket: &Value) -> Option<i64> {
    match ticket.get("queueID")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

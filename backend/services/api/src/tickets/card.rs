use nextup_triage::engine::WeightedTicket;
use nextup_triage::sla::SlaResult;
use nextup_triage::timefmt::{format_display, format_time_left};
use nextup_triage::RankingPolicy;
use serde_json::{json, Value};

pub const NO_TICKETS: &str = "No tickets assigned";
pub const DESCRIPTION_LIMIT: usize = 200;
const ELLIPSIS: &str = "...";

/// Cut a description to at most `limit` characters, ellipsis included.
pub fn truncate_description(text: &str, limit: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

pub fn ticket_url(template: &str, id: i64) -> String {
    template.replace("{id}", &id.to_string())
}

fn sla_status(result: &SlaResult) -> (&'static str, &'static str) {
    match (result.is_completed(), result.sla_met) {
        (true, true) => ("Met", "good"),
        (true, false) => ("Missed", "attention"),
        (false, true) => ("On track", "good"),
        (false, false) => ("Overdue", "attention"),
    }
}

fn sla_block(result: &SlaResult) -> Vec<Value> {
    let (label, color) = sla_status(result);
    vec![
        json!({
            "type": "TextBlock",
            "text": format!("{}: {label}", result.sla_name),
            "color": color,
            "weight": "Bolder",
            "spacing": "Small",
        }),
        json!({
            "type": "FactSet",
            "facts": [
                {"title": "Due", "value": result.due_date_formatted},
                {"title": "Met", "value": result.met_date_formatted},
                {"title": "Time left", "value": format_time_left(result.time_left_seconds)},
            ],
        }),
    ]
}

fn ticket_container(ranked: &WeightedTicket, policy: &RankingPolicy) -> Value {
    let ticket = &ranked.ticket;

    let (priority_label, priority_color) = match ticket.priority.and_then(|c| policy.priority(c)) {
        Some(level) => (level.label.clone(), level.color.clone()),
        None => ("Unknown".to_string(), "default".to_string()),
    };
    let status_label = match ticket.status {
        Some(code) => policy
            .status(code)
            .map(|s| s.label.clone())
            .unwrap_or_else(|| format!("Status {code}")),
        None => "Unknown".to_string(),
    };
    let created = ticket
        .create_date
        .map(|at| format_display(at, policy.display_timezone))
        .unwrap_or_else(|| "Unknown".to_string());
    let title = ticket.title.as_deref().unwrap_or("(no title)");
    let description = ticket
        .description
        .as_deref()
        .map(|d| truncate_description(d, DESCRIPTION_LIMIT))
        .unwrap_or_default();

    let mut items = vec![
        json!({
            "type": "TextBlock",
            "text": format!("#{}: {title}", ticket.id),
            "weight": "Bolder",
            "size": "Medium",
            "wrap": true,
        }),
        json!({
            "type": "TextBlock",
            "text": format!("Priority: {priority_label}"),
            "color": priority_color,
            "weight": "Bolder",
            "spacing": "None",
        }),
    ];

    if !description.is_empty() {
        items.push(json!({
            "type": "TextBlock",
            "text": description,
            "wrap": true,
            "isSubtle": true,
        }));
    }

    items.push(json!({
        "type": "FactSet",
        "facts": [
            {"title": "Status", "value": status_label},
            {"title": "Created", "value": created},
            {"title": "Weight", "value": ranked.weight.to_string()},
        ],
    }));

    for result in &ranked.sla_results {
        items.extend(sla_block(result));
    }

    json!({
        "type": "Container",
        "separator": true,
        "items": items,
    })
}

/// Build the Adaptive Card posted to the technician's chat.
pub fn construct_ticket_card(
    ranked: &[WeightedTicket],
    policy: &RankingPolicy,
    url_template: &str,
) -> Value {
    let (body, actions): (Vec<Value>, Vec<Value>) = if ranked.is_empty() {
        (
            vec![json!({"type": "TextBlock", "text": NO_TICKETS, "wrap": true})],
            Vec::new(),
        )
    } else {
        let body = ranked.iter().map(|t| ticket_container(t, policy)).collect();
        let actions = ranked
            .iter()
            .map(|t| {
                json!({
                    "type": "Action.OpenUrl",
                    "title": format!("View Ticket {}", t.ticket.id),
                    "url": ticket_url(url_template, t.ticket.id),
                })
            })
            .collect();
        (body, actions)
    };

    json!({
        "type": "AdaptiveCard",
        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
        "version": "1.3",
        "body": body,
        "actions": actions,
    })
}

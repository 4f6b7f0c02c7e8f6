use chrono::{DateTime, Utc};
use nextup_common::error::{NextupError, NextupResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;
use crate::timefmt::parse_timestamp;

/// A ticket as the upstream webhook sends it. Every field is optional and
/// wrongly-typed scalars deserialize to `None`; timestamps stay raw until
/// [`TicketRecord::from_raw`] parses them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTicket {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub priority: Option<i64>,
    #[serde(default, rename = "queueID", deserialize_with = "lenient::opt_i64")]
    pub queue_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub first_response_date_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub first_response_due_date_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub resolution_plan_date_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub resolution_plan_due_date_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub resolved_date_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub resolved_due_date_time: Option<String>,
    #[serde(default, rename = "companyID", deserialize_with = "lenient::opt_i64")]
    pub company_id: Option<i64>,
    #[serde(default, rename = "contactID", deserialize_with = "lenient::opt_i64")]
    pub contact_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub issue_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub sub_issue_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub service_level_agreement_has_been_met: Option<bool>,
}

/// A validated ticket with UTC instants. This is what scoring sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<i64>,
    pub priority: Option<i64>,
    #[serde(rename = "queueID")]
    pub queue_id: Option<i64>,
    pub create_date: Option<DateTime<Utc>>,
    pub first_response_date_time: Option<DateTime<Utc>>,
    pub first_response_due_date_time: Option<DateTime<Utc>>,
    pub resolution_plan_date_time: Option<DateTime<Utc>>,
    pub resolution_plan_due_date_time: Option<DateTime<Utc>>,
    pub resolved_date_time: Option<DateTime<Utc>>,
    pub resolved_due_date_time: Option<DateTime<Utc>>,
    #[serde(rename = "companyID")]
    pub company_id: Option<i64>,
    #[serde(rename = "contactID")]
    pub contact_id: Option<i64>,
    pub issue_type: Option<String>,
    pub sub_issue_type: Option<String>,
    pub service_level_agreement_has_been_met: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("ticket record is not a JSON object: {0}")]
    NotAnObject(String),

    #[error("ticket record has no usable id")]
    MissingId,
}

/// Parse one timestamp field, logging and dropping values that do not parse.
fn timestamp_field(ticket_id: i64, field: &'static str, raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match parse_timestamp(raw) {
        Ok(at) => Some(at),
        Err(e) => {
            tracing::warn!(ticket_id, field, error = %e, "ignoring malformed timestamp");
            None
        }
    }
}

impl TicketRecord {
    /// A record carrying only its id.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            title: None,
            description: None,
            status: None,
            priority: None,
            queue_id: None,
            create_date: None,
            first_response_date_time: None,
            first_response_due_date_time: None,
            resolution_plan_date_time: None,
            resolution_plan_due_date_time: None,
            resolved_date_time: None,
            resolved_due_date_time: None,
            company_id: None,
            contact_id: None,
            issue_type: None,
            sub_issue_type: None,
            service_level_agreement_has_been_met: None,
        }
    }

    pub fn from_raw(raw: RawTicket) -> Result<Self, RecordError> {
        let id = raw.id.ok_or(RecordError::MissingId)?;

        Ok(Self {
            id,
            create_date: timestamp_field(id, "createDate", raw.create_date.as_deref()),
            first_response_date_time: timestamp_field(
                id,
                "firstResponseDateTime",
                raw.first_response_date_time.as_deref(),
            ),
            first_response_due_date_time: timestamp_field(
                id,
                "firstResponseDueDateTime",
                raw.first_response_due_date_time.as_deref(),
            ),
            resolution_plan_date_time: timestamp_field(
                id,
                "resolutionPlanDateTime",
                raw.resolution_plan_date_time.as_deref(),
            ),
            resolution_plan_due_date_time: timestamp_field(
                id,
                "resolutionPlanDueDateTime",
                raw.resolution_plan_due_date_time.as_deref(),
            ),
            resolved_date_time: timestamp_field(
                id,
                "resolvedDateTime",
                raw.resolved_date_time.as_deref(),
            ),
            resolved_due_date_time: timestamp_field(
                id,
                "resolvedDueDateTime",
                raw.resolved_due_date_time.as_deref(),
            ),
            title: raw.title,
            description: raw.description,
            status: raw.status,
            priority: raw.priority,
            queue_id: raw.queue_id,
            company_id: raw.company_id,
            contact_id: raw.contact_id,
            issue_type: raw.issue_type,
            sub_issue_type: raw.sub_issue_type,
            service_level_agreement_has_been_met: raw.service_level_agreement_has_been_met,
        })
    }

    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        if !value.is_object() {
            return Err(RecordError::NotAnObject(json_kind(value).to_string()));
        }
        let raw: RawTicket = serde_json::from_value(value.clone())
            .map_err(|e| RecordError::NotAnObject(e.to_string()))?;
        Self::from_raw(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub tickets: Vec<TicketRecord>,
    pub rejected: Vec<RejectedRecord>,
}

/// Validate an upstream batch. Anything other than a JSON array is refused;
/// unusable elements are quarantined and the rest keep their input order.
pub fn parse_batch(value: &Value) -> NextupResult<ParsedBatch> {
    let items = value.as_array().ok_or_else(|| {
        NextupError::Validation(format!(
            "expected a JSON array of tickets, got {}",
            json_kind(value)
        ))
    })?;

    let mut batch = ParsedBatch::default();
    for (index, item) in items.iter().enumerate() {
        match TicketRecord::from_value(item) {
            Ok(ticket) => batch.tickets.push(ticket),
            Err(e) => {
                tracing::error!(index, error = %e, "quarantining ticket record");
                batch.rejected.push(RejectedRecord {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(batch)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn parses_full_record() {
        let value = json!({
            "id": 4821,
            "title": "Printer offline",
            "description": "Front desk printer shows offline",
            "status": 1,
            "priority": 2,
            "queueID": 29682833,
            "createDate": "2024-03-01T15:00:00Z",
            "firstResponseDateTime": "2024-03-01T15:20:00Z",
            "firstResponseDueDateTime": "2024-03-01T16:00:00Z",
            "resolvedDueDateTime": "2024-03-04T15:00:00.000",
            "companyID": 174,
            "issueType": "Hardware",
            "serviceLevelAgreementHasBeenMet": true
        });

        let ticket = TicketRecord::from_value(&value).expect("valid record");
        assert_eq!(ticket.id, 4821);
        assert_eq!(ticket.priority, Some(2));
        assert_eq!(ticket.queue_id, Some(29682833));
        assert_eq!(
            ticket.create_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap())
        );
        assert_eq!(
            ticket.resolved_due_date_time,
            Some(Utc.with_ymd_and_hms(2024, 3, 4, 15, 0, 0).unwrap())
        );
        assert!(ticket.resolution_plan_due_date_time.is_none());
        assert_eq!(ticket.company_id, Some(174));
        assert_eq!(ticket.service_level_agreement_has_been_met, Some(true));
    }

    #[test]
    fn malformed_timestamp_becomes_absent() {
        let value = json!({"id": 1, "createDate": "not a date", "resolvedDueDateTime": 12345});
        let ticket = TicketRecord::from_value(&value).expect("still valid");
        assert!(ticket.create_date.is_none());
        assert!(ticket.resolved_due_date_time.is_none());
    }

    #[test]
    fn string_id_is_accepted() {
        let ticket = TicketRecord::from_value(&json!({"id": "77"})).unwrap();
        assert_eq!(ticket.id, 77);
    }

    #[test]
    fn missing_id_is_rejected() {
        let err = TicketRecord::from_value(&json!({"title": "orphan"})).unwrap_err();
        assert_eq!(err, RecordError::MissingId);
    }

    #[test]
    fn non_object_is_rejected() {
        let err = TicketRecord::from_value(&json!("ticket")).unwrap_err();
        assert!(matches!(err, RecordError::NotAnObject(_)));
    }

    #[test]
    fn batch_requires_array() {
        let err = parse_batch(&json!({"id": 1})).unwrap_err();
        assert!(matches!(err, NextupError::Validation(_)));
        assert!(err.to_string().contains("object"));
    }

    #[test]
    fn batch_quarantines_bad_records_and_keeps_order() {
        let batch = parse_batch(&json!([
            {"id": 3},
            {"title": "no id"},
            42,
            {"id": 1}
        ]))
        .unwrap();

        let ids: Vec<i64> = batch.tickets.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1]);
        let rejected: Vec<usize> = batch.rejected.iter().map(|r| r.index).collect();
        assert_eq!(rejected, vec![1, 2]);
    }

    #[test]
    fn empty_batch_is_fine() {
        let batch = parse_batch(&json!([])).unwrap();
        assert!(batch.tickets.is_empty());
        assert!(batch.rejected.is_empty());
    }
}

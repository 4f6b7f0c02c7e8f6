use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Display pattern for every user-facing timestamp, e.g. `03-10-24 2:05 PM CDT`.
pub const DISPLAY_FORMAT: &str = "%m-%d-%y %-I:%M %p %Z";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized timestamp {0:?}")]
pub struct TimestampError(pub String);

/// Parse a ticket-system timestamp into a UTC instant.
///
/// Accepts RFC 3339 with any offset, naive ISO-8601 date-times (with `T` or a
/// space, optional fraction) which are taken to be UTC, and bare dates which
/// resolve to UTC midnight.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampError(raw.to_string()))
}

/// Render a UTC instant in the display zone.
pub fn format_display(at: DateTime<Utc>, zone: Tz) -> String {
    at.with_timezone(&zone).format(DISPLAY_FORMAT).to_string()
}

/// Compact `1d 3h 5m` rendering of an absolute duration.
pub fn humanize_seconds(seconds: f64) -> String {
    let total_minutes = (seconds.abs() / 60.0).floor() as i64;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || parts.is_empty() {
        parts.push(format!("{minutes}m"));
    }
    parts.join(" ")
}

/// Signed remaining time as shown on the card: `2h 15m left` or `overdue by 1d 3h`.
pub fn format_time_left(seconds: f64) -> String {
    if seconds >= 0.0 {
        format!("{} left", humanize_seconds(seconds))
    } else {
        format!("overdue by {}", humanize_seconds(seconds))
    }
}

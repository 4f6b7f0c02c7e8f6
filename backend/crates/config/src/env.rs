use nextup_common::error::{NextupError, NextupResult};
use serde::Deserialize;
use std::env;

/// Queues whose tickets never reach the ranker (internal/admin queues).
pub const DEFAULT_EXCLUDED_QUEUE_IDS: &[i64] = &[29683506, 29683552, 29683546, 29683535];

pub const DEFAULT_TICKET_URL_TEMPLATE: &str = "https://ww15.autotask.net/Mvc/ServiceDesk/TicketDetail.mvc?workspace=False&ids%5B0%5D={id}&ticketId={id}";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub ticket_webhook_url: Option<String>,
    pub webhook_timeout_secs: u64,
    pub webhook_max_retries: u32,
    pub excluded_queue_ids: Vec<i64>,
    pub rank_top_n: usize,
    pub display_timezone: Option<String>,
    pub ranking_policy_path: Option<String>,
    pub ticket_url_template: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads the vars, failing fast on
    /// values that are set but unparseable.
    pub fn from_env() -> NextupResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        let rank_top_n: usize = parse_var_or("RANK_TOP_N", 1)?;
        if rank_top_n == 0 {
            return Err(NextupError::Config(
                "RANK_TOP_N must be at least 1".to_string(),
            ));
        }

        let excluded_queue_ids = match get_opt_var("EXCLUDED_QUEUE_IDS") {
            Some(raw) => parse_csv_ids("EXCLUDED_QUEUE_IDS", &raw)?,
            None => DEFAULT_EXCLUDED_QUEUE_IDS.to_vec(),
        };

        Ok(Self {
            host: get_var_or("HOST", "0.0.0.0"),
            port: parse_var_or("PORT", 8080)?,
            log_level: get_var_or("LOG_LEVEL", "info"),
            ticket_webhook_url: get_opt_var("TICKET_WEBHOOK_URL"),
            webhook_timeout_secs: parse_var_or("TICKET_WEBHOOK_TIMEOUT_SECS", 30)?,
            webhook_max_retries: parse_var_or("TICKET_WEBHOOK_MAX_RETRIES", 3)?,
            excluded_queue_ids,
            rank_top_n,
            display_timezone: get_opt_var("DISPLAY_TIMEZONE"),
            ranking_policy_path: get_opt_var("RANKING_POLICY_PATH"),
            ticket_url_template: get_var_or("TICKET_URL_TEMPLATE", DEFAULT_TICKET_URL_TEMPLATE),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a comma-separated list of integer ids. Blank entries are ignored;
/// an entry that is not an integer is a configuration error.
pub fn parse_csv_ids(key: &str, raw: &str) -> NextupResult<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|e| NextupError::Config(format!("invalid id {s:?} in {key}: {e}")))
        })
        .collect()
}

fn get_opt_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_var_or<T>(key: &str, default: T) -> NextupResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_opt_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| NextupError::Config(format!("invalid {key}: {e}"))),
        None => Ok(default),
    }
}

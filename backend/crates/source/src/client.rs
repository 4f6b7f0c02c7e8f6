use std::time::Duration;

use async_trait::async_trait;
use nextup_common::error::NextupError;
use reqwest::{Client, StatusCode};
use serde_json::Value;

const MAX_BACKOFF_SECS: u64 = 30;

/// Exponential backoff before retry `attempt`, capped. Large attempt numbers
/// saturate instead of overflowing the shift.
fn backoff_secs(attempt: u32) -> u64 {
    1u64.checked_shl(attempt)
        .unwrap_or(u64::MAX)
        .min(MAX_BACKOFF_SECS)
}

/// Field of the webhook envelope that carries the technician's tickets.
pub const ENVELOPE_FIELD: &str = "my_ticket";

#[derive(Debug, Clone)]
pub struct WebhookClientConfig {
    pub url: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },

    #[error("malformed ticket envelope: {0}")]
    MalformedEnvelope(String),
}

impl From<SourceError> for NextupError {
    fn from(err: SourceError) -> Self {
        NextupError::Upstream(err.to_string())
    }
}

/// Where ticket batches come from. Ranking never calls this itself; the
/// service fetches first and ranks afterwards.
#[async_trait]
pub trait TicketSource: Send + Sync {
    async fn fetch_tickets(&self, user_upn: &str) -> Result<Vec<Value>, SourceError>;
}

#[derive(Clone)]
pub struct WebhookTicketSource {
    client: Client,
    config: WebhookClientConfig,
}

impl WebhookTicketSource {
    pub fn new(config: WebhookClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &WebhookClientConfig {
        &self.config
    }

    async fn request_with_retry(&self, user_upn: &str) -> Result<Value, SourceError> {
        let payload = serde_json::json!({ "user_upn": user_upn });
        let mut last_error = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = backoff_secs(attempt);
                tracing::warn!(attempt, backoff_secs = delay, "retrying ticket webhook after backoff");
                tokio::time::sleep(Duration::from_secs(delay)).await;
            }

            let response = match self
                .client
                .post(&self.config.url)
                .json(&payload)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = e.to_string();
                    if e.is_timeout() || e.is_connect() {
                        continue;
                    }
                    return Err(SourceError::RequestError(e));
                }
            };

            let status = response.status();

            if status.is_success() {
                return response
                    .json::<Value>()
                    .await
                    .map_err(|e| SourceError::MalformedEnvelope(e.to_string()));
            }

            // Honor Retry-After header for 429
            if status == StatusCode::TOO_MANY_REQUESTS {
                if let Some(retry_after) = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                {
                    let wait = std::cmp::min(retry_after, 60);
                    tracing::warn!(wait, "ticket webhook rate-limited, waiting Retry-After");
                    tokio::time::sleep(Duration::from_secs(wait)).await;
                }
                last_error = "429 Too Many Requests".to_string();
                continue;
            }

            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = format!("{status}: {body}");
                continue;
            }

            // Fail fast on 4xx (except 429 handled above)
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::HttpError { status, body });
        }

        Err(SourceError::MaxRetriesExceeded {
            attempts: self.config.max_retries.saturating_add(1),
            last_error,
        })
    }
}

/// Pull the ticket list out of a webhook response. Accepts a bare array or
/// an object whose `my_ticket` field is an array (or null for "none").
pub fn unwrap_envelope(body: Value) -> Result<Vec<Value>, SourceError> {
    match body {
        Value::Array(tickets) => Ok(tickets),
        Value::Object(mut map) => match map.remove(ENVELOPE_FIELD) {
            Some(Value::Array(tickets)) => Ok(tickets),
            Some(Value::Null) => Ok(Vec::new()),
            Some(other) => Err(SourceError::MalformedEnvelope(format!(
                "{ENVELOPE_FIELD} is not a list: {other}"
            ))),
            None => Err(SourceError::MalformedEnvelope(format!(
                "response has no {ENVELOPE_FIELD} field"
            ))),
        },
        other => Err(SourceError::MalformedEnvelope(format!(
            "unexpected response body: {other}"
        ))),
    }
}

#[async_trait]
impl TicketSource for WebhookTicketSource {
    async fn fetch_tickets(&self, user_upn: &str) -> Result<Vec<Value>, SourceError> {
        let body = self.request_with_retry(user_upn).await?;
        let tickets = unwrap_envelope(body)?;
        tracing::info!(count = tickets.len(), "fetched tickets from webhook");
        Ok(tickets)
    }
}

mod command;
mod error;
mod stats;
mod tickets;

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use nextup_common::error::{NextupError, NextupResult};
use nextup_common::types::ServiceInfo;
use nextup_config::{init_tracing, AppConfig};
use nextup_source::{TicketSource, WebhookClientConfig, WebhookTicketSource};
use nextup_triage::RankingPolicy;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<RankingPolicy>,
    pub source: Option<Arc<dyn TicketSource>>,
    pub excluded_queues: Arc<HashSet<i64>>,
    pub top_n: usize,
    pub ticket_url_template: Arc<str>,
    /// Read once per request; ranking itself never looks at the clock.
    pub clock: fn() -> DateTime<Utc>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("nextup-api"))
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .merge(tickets::router())
        .merge(stats::router())
        .merge(command::router())
        .layer(cors)
        .with_state(state)
}

/// Policy file (if any) first, then the display zone override.
fn load_policy(config: &AppConfig) -> NextupResult<RankingPolicy> {
    let mut policy = match &config.ranking_policy_path {
        Some(path) => RankingPolicy::from_json_file(path)?,
        None => RankingPolicy::default(),
    };

    if let Some(zone) = &config.display_timezone {
        policy.display_timezone = zone
            .parse::<Tz>()
            .map_err(|e| NextupError::Config(format!("invalid DISPLAY_TIMEZONE {zone:?}: {e}")))?;
    }

    Ok(policy)
}

fn build_source(config: &AppConfig) -> NextupResult<Option<Arc<dyn TicketSource>>> {
    let Some(url) = &config.ticket_webhook_url else {
        return Ok(None);
    };

    let source = WebhookTicketSource::new(WebhookClientConfig {
        url: url.clone(),
        max_retries: config.webhook_max_retries,
        timeout_secs: config.webhook_timeout_secs,
    })
    .map_err(|e| NextupError::Config(format!("cannot build webhook client: {e}")))?;

    tracing::info!(
        max_retries = source.config().max_retries,
        timeout_secs = source.config().timeout_secs,
        "ticket webhook configured"
    );
    let source: Arc<dyn TicketSource> = Arc::new(source);
    Ok(Some(source))
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("failed to load config");
    init_tracing(&config.log_level);
    tracing::info!(service = "nextup-api", "starting");

    let policy = load_policy(&config).expect("failed to load ranking policy");
    tracing::info!(
        version = policy.version,
        timezone = %policy.display_timezone,
        top_n = config.rank_top_n,
        "ranking policy loaded"
    );

    let source = build_source(&config).expect("failed to configure ticket source");
    if source.is_none() {
        tracing::warn!("TICKET_WEBHOOK_URL not set, /command will be unavailable");
    }

    let state = AppState {
        policy: Arc::new(policy),
        source,
        excluded_queues: Arc::new(config.excluded_queue_ids.iter().copied().collect()),
        top_n: config.rank_top_n,
        ticket_url_template: Arc::from(config.ticket_url_template.as_str()),
        clock: Utc::now,
    };

    let app = build_router(state);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}

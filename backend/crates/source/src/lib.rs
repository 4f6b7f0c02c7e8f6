pub mod client;
pub mod filter;

pub use client::{SourceError, TicketSource, WebhookClientConfig, WebhookTicketSource};
pub use filter::filter_excluded_queues;

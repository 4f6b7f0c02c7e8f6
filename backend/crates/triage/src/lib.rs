//! SLA-aware ticket triage: validate a raw ticket batch, evaluate SLA
//! deadlines, weight each ticket and pick the most urgent ones.

pub mod config;
pub mod engine;
pub mod error;
pub mod lenient;
pub mod scorers;
pub mod sla;
pub mod stats;
pub mod ticket;
pub mod timefmt;
pub mod trace;

pub use config::RankingPolicy;
pub use engine::{rank_batch, rank_tickets, score_ticket, RankOutcome, WeightedTicket};
pub use error::ScoreError;
pub use sla::{evaluate_sla, SlaKind, SlaResult};
pub use stats::{batch_stats, compute_ticket_stats, TicketStats};
pub use ticket::{parse_batch, RawTicket, TicketRecord};
pub use trace::WeightTrace;

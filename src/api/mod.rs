pub mod client;
pub mod models;

pub use client::{PartnerClient, QueryPairs};
pub use models::{BettingTransaction, ListResponse, TransactionStatus, TransactionType};

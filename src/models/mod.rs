//! Data models for console commands and services
//!
//! Wire types live in `api::models`; this module holds client-side state
//! built on top of them.

pub mod list_query;
pub mod listing;
pub mod live;

pub use list_query::ListQuery;
pub use listing::Listing;
pub use live::TransactionUpdate;

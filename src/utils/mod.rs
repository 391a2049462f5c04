pub mod table;
pub mod page;
pub mod errors;
pub mod format;
pub mod ratelimit;
pub mod encryption;

pub use table::Table;
pub use page::Page;
pub use errors::extract_error_message_from_body;
pub use format::{format_amount, format_datetime, parse_amount, parse_date, parse_timestamp, short_id};
pub use ratelimit::{check_cooldown, clear_cooldown, get_cooldown_seconds};
pub use encryption::{CryptoError, SessionCipher};

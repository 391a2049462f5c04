pub mod account_service;
pub mod auth_service;
pub mod betting_service;
pub mod cancellation_service;
pub mod commission_service;
pub mod live_service;
pub mod network_service;
pub mod recharge_service;
pub mod transaction_service;
pub mod transfer_service;

pub mod account_service;
pub mod chart_service;
pub mod conversation_service;
pub mod session_guard;
pub mod transaction_service;

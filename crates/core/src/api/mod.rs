pub mod endpoints;
pub mod gateway;
pub mod http;
pub mod traits;
